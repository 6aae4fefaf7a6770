//! `additionalProperties`: the catch-all for keys no other keyword claims.
//!
//! `false` closes the record; `true` or absence allows any value; a schema
//! types the values.
use serde_json::Value;

use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::RecordId;
use crate::registry::Registry;
use crate::rules::Scope;
use crate::rules::catch_all::{self, CatchAll};
use crate::schema::SchemaNode;

pub const FIELD_NAME: &str = "additional_properties";

/// Install the catch-all member described by `object`'s
/// `additionalProperties` keyword on `target`.
pub fn install(
    registry: &Registry,
    arena: &mut TypeArena,
    object: &SchemaNode<'_>,
    target: RecordId,
) -> Result<RecordId> {
    if !registry.config().include_additional_properties {
        return Ok(target);
    }
    let additional = object.keyword("additionalProperties");
    let value = match additional.as_ref().map(|node| (node, node.value())) {
        Some((_, Value::Bool(false))) => return Ok(target),
        None | Some((_, Value::Bool(true))) => arena.any(),
        Some((node, Value::Object(_))) => {
            let base = format!("{}Property", arena.record(target).name);
            registry.resolve(arena, &base, node, Scope::within(target))?
        }
        Some((node, _)) => {
            return Err(GenerationError::malformed(node.id(), "a boolean or a schema"));
        }
    };
    let origin = additional.as_ref().map(|node| node.id()).unwrap_or(object.id()).clone();
    catch_all::install(
        registry,
        arena,
        target,
        CatchAll { field: FIELD_NAME, value, origin: &origin, key_patterns: Vec::new() },
    )
}

#[cfg(test)]
mod tests {
    use crate::arena::TypeArena;
    use crate::config::GenerationConfig;
    use crate::ir::Ty;
    use crate::registry::Registry;
    use crate::rules::Scope;
    use crate::rules::catch_all::pairs_are_consistent;
    use crate::schema::SchemaDocument;
    use serde_json::{Value, json};

    fn root_record(schema: Value, config: GenerationConfig) -> (TypeArena, crate::ir::RecordId) {
        let doc = SchemaDocument::new("doc", schema);
        let registry = Registry::new(config);
        let mut arena = TypeArena::new();
        let ty = registry.resolve(&mut arena, "project", &doc.root(), Scope::top_level()).unwrap();
        let Ty::Record(rid) = arena.get(ty).clone() else { panic!("expected a record") };
        (arena, rid)
    }

    #[test]
    fn absent_means_any_value() {
        let (arena, rid) = root_record(json!({"type": "object"}), GenerationConfig::default());
        let record = arena.record(rid);
        let field = record.field("additional_properties").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<serde_json::Value>>");
        assert!(pairs_are_consistent(&arena, record));
    }

    #[test]
    fn false_closes_the_record() {
        let (arena, rid) = root_record(json!({"type": "object", "additionalProperties": false}), GenerationConfig::default());
        assert!(arena.record(rid).fields.is_empty());
    }

    #[test]
    fn schemas_name_their_value_type_after_the_record() {
        let schema = json!({
            "type": "object",
            "additionalProperties": {"type": "object", "properties": {"x": {"type": "number"}}}
        });
        let (arena, rid) = root_record(schema, GenerationConfig::default());
        let field = arena.record(rid).field("additional_properties").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<ProjectProperty>>");
    }

    #[test]
    fn can_be_switched_off() {
        let config = GenerationConfig { include_additional_properties: false, ..GenerationConfig::default() };
        let (arena, rid) = root_record(json!({"type": "object"}), config);
        assert!(arena.record(rid).accessors.is_empty());
    }
}
