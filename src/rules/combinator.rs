//! `oneOf` / `anyOf` / `allOf`.
//!
//! Every branch is resolved so its nested types exist, but only a lone
//! `allOf` branch passes its type through; anything else is untyped.
use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::TypeId;
use crate::registry::Registry;
use crate::rules::Scope;
use crate::schema::SchemaNode;

const COMBINATORS: [&str; 3] = ["allOf", "oneOf", "anyOf"];

pub fn resolve(
    registry: &Registry,
    arena: &mut TypeArena,
    name: &str,
    node: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    let mut passthrough = None;
    let mut branch_count = 0;
    for combinator in COMBINATORS {
        let Some(list) = node.keyword(combinator) else {
            continue;
        };
        if !list.value().is_array() {
            return Err(GenerationError::malformed(list.id(), "a list of sub-schemas"));
        }
        for branch in list.entries_indexed()? {
            let ty = registry.resolve(arena, name, &branch, scope)?;
            branch_count += 1;
            if combinator == "allOf" && passthrough.is_none() {
                passthrough = Some(ty);
            }
        }
    }
    match passthrough {
        Some(ty) if branch_count == 1 => Ok(ty),
        _ => Ok(arena.any()),
    }
}
