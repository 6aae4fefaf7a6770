//! `$ref` to a local definition.
use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::TypeId;
use crate::registry::Registry;
use crate::rules::Scope;
use crate::schema::SchemaNode;

/// Resolve the reference target under its own identity, so every site that
/// points at one definition shares its type.
pub fn resolve(
    registry: &Registry,
    arena: &mut TypeArena,
    name: &str,
    node: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    let reference = node
        .str_keyword("$ref")
        .ok_or_else(|| GenerationError::malformed(node.id(), "`$ref` to be a string"))?;
    let target = node.resolve_ref(reference)?;
    // `#/definitions/Address` names its type after the definition.
    let target_name = reference
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && *segment != "#")
        .unwrap_or(name);
    registry.resolve(arena, target_name, &target, scope)
}
