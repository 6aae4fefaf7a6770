//! Object-shaped nodes become records; members are contributed in order by
//! `properties`, `patternProperties` and `additionalProperties`.
//!
//! An object with `patternProperties` but no `properties` is a plain map
//! unless `additionalProperties` opens it. Here an absent
//! `additionalProperties` counts as closed: the patterns describe every key,
//! so no `Map<String, Any>` fallback member is generated. On a record the
//! same absence still installs that fallback.
use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::TypeId;
use crate::registry::Registry;
use crate::rules::{Scope, additional_properties, pattern_properties, properties};
use crate::schema::SchemaNode;

pub fn resolve(
    registry: &Registry,
    arena: &mut TypeArena,
    name: &str,
    node: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    if let Some(patterns) = pure_pattern_map(registry, node) {
        return pattern_properties::resolve_type(registry, arena, name, &patterns, scope);
    }

    let type_name = registry.namer().type_name(name, node);
    let (record, ty) = arena.declare_record(&type_name, node.id().clone(), scope.parent);
    debug!(record = %arena.record(record).name, node = %node.id(), "declared record");

    let required = required_names(node)?;
    if let Some(props) = node.keyword("properties") {
        properties::install(registry, arena, &props, &required, record)?;
    }
    let patterns = node.keyword("patternProperties");
    if let Some(patterns) = patterns.as_ref() {
        let field = registry.namer().field_name(name, patterns);
        pattern_properties::install_field(registry, arena, &field, Some(patterns), record)?;
    }
    additional_properties::install(registry, arena, node, record)?;
    Ok(ty)
}

/// A node whose only members come from `patternProperties` is a plain map,
/// not a record. `additionalProperties` must be absent or `false`; `true` or
/// a schema turns it back into a record with both catch-all members.
fn pure_pattern_map<'a>(registry: &Registry, node: &SchemaNode<'a>) -> Option<SchemaNode<'a>> {
    if !registry.config().include_pattern_properties || node.has("properties") {
        return None;
    }
    let closed = match node.keyword("additionalProperties") {
        None => true,
        Some(additional) => additional.value() == &Value::Bool(false),
    };
    if !closed {
        return None;
    }
    node.keyword("patternProperties")
}

fn required_names(node: &SchemaNode<'_>) -> Result<HashSet<String>> {
    let Some(required) = node.keyword("required") else {
        return Ok(HashSet::new());
    };
    match required.value() {
        // draft-03 style `required: true` lives on the property itself
        Value::Bool(_) => Ok(HashSet::new()),
        Value::Array(names) => names
            .iter()
            .map(|n| {
                n.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| GenerationError::malformed(required.id(), "a list of property names"))
            })
            .collect(),
        _ => Err(GenerationError::malformed(required.id(), "a list of property names")),
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::{Primitive, Ty};
    use crate::rules::tests::resolve_root;
    use crate::schema::SchemaDocument;
    use serde_json::json;

    #[test]
    fn members_are_contributed_in_precedence_order() {
        let doc = SchemaDocument::new("doc", json!({
            "type": "object",
            "additionalProperties": {"type": "integer"},
            "patternProperties": {"^x-": {"type": "string"}},
            "properties": {"id": {"type": "string"}}
        }));
        let (arena, ty) = resolve_root(&doc);
        let Ty::Record(rid) = arena.get(ty.unwrap()) else { panic!("expected a record") };
        let names: Vec<_> = arena.record(*rid).fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "root", "additional_properties"]);
    }

    #[test]
    fn pattern_only_objects_are_maps() {
        let doc = SchemaDocument::new("doc", json!({
            "type": "object",
            "additionalProperties": false,
            "patternProperties": {"^[a-z]+$": {"type": "number"}}
        }));
        let (arena, ty) = resolve_root(&doc);
        let ty = ty.unwrap();
        let value = arena.map_value(ty).expect("a map");
        assert_eq!(arena.get(value), &Ty::Primitive(Primitive::Number));
        assert_eq!(arena.record_count(), 0);
    }

    #[test]
    fn pattern_only_objects_without_additional_properties_stay_maps() {
        let doc = SchemaDocument::new("doc", json!({
            "type": "object",
            "patternProperties": {"^[a-z]+$": {"type": "string"}}
        }));
        let (arena, ty) = resolve_root(&doc);
        assert_eq!(arena.describe(ty.unwrap()), "IndexMap<String, Option<String>>");
        assert_eq!(arena.record_count(), 0);

        let doc = SchemaDocument::new("doc", json!({
            "type": "object",
            "additionalProperties": true,
            "patternProperties": {"^[a-z]+$": {"type": "string"}}
        }));
        let (arena, ty) = resolve_root(&doc);
        let Ty::Record(rid) = arena.get(ty.unwrap()) else { panic!("expected a record") };
        let names: Vec<_> = arena.record(*rid).fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["root", "additional_properties"]);
    }

    #[test]
    fn required_must_list_names() {
        let doc = SchemaDocument::new("doc", json!({"type": "object", "required": [1]}));
        let (_, ty) = resolve_root(&doc);
        assert!(ty.is_err());
    }
}
