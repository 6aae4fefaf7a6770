//! `items`: lists of a single item type.
use serde_json::Value;

use crate::arena::TypeArena;
use crate::error::Result;
use crate::ir::TypeId;
use crate::naming::singular;
use crate::registry::Registry;
use crate::rules::Scope;
use crate::schema::SchemaNode;

/// Item types are named after the singular of the list's name. A tuple-form
/// `items` list uses its first entry.
pub fn resolve(
    registry: &Registry,
    arena: &mut TypeArena,
    name: &str,
    node: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    let item_name = singular(name, &registry.config().plural_suffix);
    let item = match node.keyword("items") {
        None => arena.any(),
        Some(items) => match items.value() {
            Value::Array(_) => match items.entries_indexed()?.into_iter().next() {
                Some(first) => registry.resolve(arena, item_name, &first, scope)?,
                None => arena.any(),
            },
            _ => registry.resolve(arena, item_name, &items, scope)?,
        },
    };
    Ok(arena.list_of(item))
}
