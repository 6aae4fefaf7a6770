//! `patternProperties`: any key matching one of the patterns maps to a value
//! of that pattern's sub-schema type.
//!
//! Two call shapes:
//! - [`resolve_type`] produces a standalone `Map<String, V>` type;
//! - [`install_field`] installs a catch-all member with its accessor pair on
//!   an existing record.
//!
//! With several patterns the value type is the first pattern's type in
//! document order. Later patterns are still resolved (their nested types are
//! generated) but never widen the value type.
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::{RecordId, TypeId};
use crate::naming::singular;
use crate::registry::Registry;
use crate::rules::Scope;
use crate::rules::catch_all::{self, CatchAll};
use crate::schema::SchemaNode;

/// Resolve a mapping of `pattern -> sub-schema` to `Map<String, V>`.
///
/// `node_name` only seeds the names of nested value types (singularised);
/// the map itself is not named.
pub fn resolve_type(
    registry: &Registry,
    arena: &mut TypeArena,
    node_name: &str,
    patterns: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    let (value, _) = resolve_value_type(registry, arena, node_name, patterns, scope)?;
    Ok(arena.map_of(value))
}

/// Install a private map member named `node_name` on `target`, plus a
/// catch-all getter returning the whole map and a catch-all setter taking
/// `(key, value)`.
///
/// No-op when pattern properties are disabled or `patterns` is absent.
pub fn install_field(
    registry: &Registry,
    arena: &mut TypeArena,
    node_name: &str,
    patterns: Option<&SchemaNode<'_>>,
    target: RecordId,
) -> Result<RecordId> {
    if !registry.config().include_pattern_properties {
        return Ok(target);
    }
    let Some(patterns) = patterns else {
        return Ok(target);
    };
    let (value, key_patterns) =
        resolve_value_type(registry, arena, node_name, patterns, Scope::within(target))?;

    catch_all::install(
        registry,
        arena,
        target,
        CatchAll { field: node_name, value, origin: patterns.id(), key_patterns },
    )
}

/// The map's value type and the key patterns it was drawn from. A
/// schema-shaped body has no key patterns of its own.
fn resolve_value_type(
    registry: &Registry,
    arena: &mut TypeArena,
    node_name: &str,
    patterns: &SchemaNode<'_>,
    scope: Scope,
) -> Result<(TypeId, Vec<String>)> {
    if patterns.as_object().is_none() {
        return Err(GenerationError::malformed(
            patterns.id(),
            "a mapping of key patterns to sub-schemas",
        ));
    }
    let base = singular(node_name, &registry.config().plural_suffix);
    if is_schema_body(patterns) {
        let name = registry.namer().field_name(base, patterns);
        debug!(node = %patterns.id(), name = %name, "resolving schema-shaped pattern body");
        return Ok((registry.resolve(arena, &name, patterns, scope)?, Vec::new()));
    }

    let mut value_types = Vec::new();
    let mut key_patterns = Vec::new();
    for (pattern, sub) in patterns.entries()? {
        if let Err(err) = Regex::new(pattern) {
            warn!(node = %sub.id(), pattern, %err, "key pattern is not a valid regex");
        }
        let name = registry.namer().field_name(base, &sub);
        debug!(node = %sub.id(), pattern, name = %name, "resolving pattern property");
        value_types.push(registry.resolve(arena, &name, &sub, scope)?);
        key_patterns.push(pattern.to_string());
    }
    let value = match value_types.first() {
        Some(first) => *first,
        None => arena.any(),
    };
    Ok((value, key_patterns))
}

/// A `patternProperties` value that is itself a schema (`type` / `$ref`)
/// rather than a container of named patterns.
fn is_schema_body(node: &SchemaNode<'_>) -> bool {
    let Some(map) = node.as_object() else {
        return false;
    };
    matches!(map.get("$ref"), Some(Value::String(_)))
        || matches!(map.get("type"), Some(Value::String(_) | Value::Array(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::ir::{AccessorKind, Capability, DefaultValue, Primitive, Ty, Visibility};
    use crate::rules::catch_all::pairs_are_consistent;
    use crate::schema::{NodeId, SchemaDocument};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn patterns_doc(patterns: Value) -> SchemaDocument {
        SchemaDocument::new("doc", json!({ "patternProperties": patterns }))
    }

    fn patterns_of(doc: &SchemaDocument) -> SchemaNode<'_> {
        doc.root().keyword("patternProperties").unwrap()
    }

    fn empty_target(arena: &mut TypeArena) -> RecordId {
        arena.declare_record("Target", NodeId::new("doc", "/target"), None).0
    }

    #[test]
    fn headers_are_installed_as_a_string_map() {
        let doc = patterns_doc(json!({"^x-.*": {"type": "string"}}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);

        let out = install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap();
        assert_eq!(out, target);

        let string = arena.primitive(Primitive::String);
        let map = arena.map_of(string);
        let record = arena.record(target);
        assert_eq!(record.fields.len(), 1);
        let field = record.field("headers").unwrap();
        assert_eq!(field.ty, map);
        assert_eq!(field.visibility, Visibility::Private);
        assert_eq!(field.default, DefaultValue::EmptyOrderedMap);
        assert_eq!(field.key_patterns, ["^x-.*"]);

        let getter = record.accessor("headers").unwrap();
        assert_eq!(getter.kind, AccessorKind::Getter { returns: map });
        assert_eq!(getter.capabilities, [Capability::CatchAllGetter]);
        let setter = record.accessor("set_headers").unwrap();
        assert_eq!(setter.kind, AccessorKind::EntrySetter { key: string, value: string });
        assert_eq!(setter.capabilities, [Capability::CatchAllSetter]);
        assert!(pairs_are_consistent(&arena, record));
    }

    #[test]
    fn first_pattern_wins_and_later_patterns_still_generate_types() {
        let doc = patterns_doc(json!({
            "^s_": {"type": "string"},
            "^n_": {"type": "object", "title": "Counter", "properties": {"n": {"type": "integer"}}}
        }));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let ty = resolve_type(&registry, &mut arena, "definitions", &patterns_of(&doc), Scope::top_level()).unwrap();

        let value = arena.map_value(ty).unwrap();
        assert_eq!(arena.get(value), &Ty::Primitive(Primitive::String));
        let counter = arena.record_named("Counter").expect("nested record is still generated");
        assert_eq!(arena.describe(arena.record(counter).field("n").unwrap().ty), "i64");
    }

    #[test]
    fn value_type_is_always_the_first_entry() {
        let kinds = [("string", Primitive::String), ("integer", Primitive::Integer), ("boolean", Primitive::Boolean)];
        for rotation in 0..kinds.len() {
            let mut patterns = serde_json::Map::new();
            for (i, (kind, _)) in kinds.iter().cycle().skip(rotation).take(kinds.len()).enumerate() {
                patterns.insert(format!("^p{i}"), json!({"type": kind}));
            }
            let doc = patterns_doc(Value::Object(patterns));
            let registry = Registry::default();
            let mut arena = TypeArena::new();
            let ty = resolve_type(&registry, &mut arena, "values", &patterns_of(&doc), Scope::top_level()).unwrap();
            let expected = kinds[rotation].1;
            assert_eq!(arena.get(arena.map_value(ty).unwrap()), &Ty::Primitive(expected));

            let target = empty_target(&mut arena);
            install_field(&registry, &mut arena, "values", Some(&patterns_of(&doc)), target).unwrap();
            let field = arena.record(target).field("values").unwrap();
            assert_eq!(arena.get(arena.map_value(field.ty).unwrap()), &Ty::Primitive(expected));
        }
    }

    #[test]
    fn single_entry_matches_the_recursive_resolution() {
        let doc = SchemaDocument::new("doc", json!({
            "definitions": {"item": {"type": "object", "properties": {"id": {"type": "string"}}}},
            "patternProperties": {".*": {"$ref": "#/definitions/item"}}
        }));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let item = doc.at_pointer("/definitions/item").unwrap();
        let direct = registry.resolve(&mut arena, "item", &item, Scope::top_level()).unwrap();
        let ty = resolve_type(&registry, &mut arena, "items", &patterns_of(&doc), Scope::top_level()).unwrap();
        assert_eq!(arena.map_value(ty), Some(direct));
    }

    #[test]
    fn no_patterns_fall_back_to_untyped() {
        let doc = patterns_doc(json!({}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let ty = resolve_type(&registry, &mut arena, "extras", &patterns_of(&doc), Scope::top_level()).unwrap();
        assert_eq!(arena.get(arena.map_value(ty).unwrap()), &Ty::Any);

        let target = empty_target(&mut arena);
        install_field(&registry, &mut arena, "extras", Some(&patterns_of(&doc)), target).unwrap();
        let field = arena.record(target).field("extras").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<serde_json::Value>>");
    }

    #[test]
    fn disabled_or_absent_leaves_the_target_untouched() {
        let doc = patterns_doc(json!({"^x-": {"type": "object", "properties": {"a": {"type": "string"}}}}));
        let config = GenerationConfig { include_pattern_properties: false, ..GenerationConfig::default() };
        let registry = Registry::new(config);
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        let before = arena.record(target).clone();

        let out = install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap();
        assert_eq!(out, target);
        assert_eq!(arena.record(target), &before);
        assert_eq!(arena.record_count(), 1);

        let registry = Registry::default();
        install_field(&registry, &mut arena, "headers", None, target).unwrap();
        assert_eq!(arena.record(target), &before);
    }

    #[test]
    fn non_mapping_values_are_malformed() {
        let doc = patterns_doc(json!(["^x-"]));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        let err = install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap_err();
        assert_eq!(err, GenerationError::malformed(patterns_of(&doc).id(), "a mapping of key patterns to sub-schemas"));
        assert!(resolve_type(&registry, &mut arena, "headers", &patterns_of(&doc), Scope::top_level()).is_err());
    }

    #[test]
    fn name_collisions_are_reported_and_leave_the_target_intact() {
        let doc = patterns_doc(json!({"^x-": {"type": "string"}}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap();
        let before = arena.record(target).clone();

        let err = install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap_err();
        match err {
            GenerationError::NameCollision { record, member, existing_origin, new_origin } => {
                assert_eq!((record.as_str(), member.as_str()), ("Target", "headers"));
                assert_eq!(existing_origin, *patterns_of(&doc).id());
                assert_eq!(new_origin, *patterns_of(&doc).id());
            }
            other => panic!("expected a collision, got {other:?}"),
        }
        assert_eq!(arena.record(target), &before);
    }

    #[test]
    fn schema_shaped_bodies_resolve_directly() {
        let doc = patterns_doc(json!({"type": "integer"}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        install_field(&registry, &mut arena, "counts", Some(&patterns_of(&doc)), target).unwrap();
        let field = arena.record(target).field("counts").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<i64>>");
        assert!(field.key_patterns.is_empty());
    }

    #[test]
    fn pattern_only_objects_accept_schema_shaped_bodies() {
        let body = json!({"type": "integer"});
        let pure = SchemaDocument::new("counts", json!({"type": "object", "patternProperties": body}));
        let (arena, ty) = crate::rules::tests::resolve_root(&pure);
        assert_eq!(arena.describe(ty.unwrap()), "IndexMap<String, Option<i64>>");

        let mixed = SchemaDocument::new("counts", json!({
            "type": "object",
            "properties": {"total": {"type": "integer"}},
            "patternProperties": body
        }));
        let (arena, ty) = crate::rules::tests::resolve_root(&mixed);
        let Ty::Record(rid) = arena.get(ty.unwrap()) else { panic!("expected a record") };
        let field = arena.record(*rid).field("root").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<i64>>");
    }

    #[test]
    fn schema_shaped_bodies_name_nested_types_like_containers() {
        let body = json!({"type": "object", "properties": {"v": {"type": "string"}}});
        let registry = Registry::default();

        let doc = patterns_doc(body.clone());
        let mut arena = TypeArena::new();
        let ty = resolve_type(&registry, &mut arena, "counts", &patterns_of(&doc), Scope::top_level()).unwrap();
        assert_eq!(arena.describe(ty), "IndexMap<String, Option<Count>>");

        let doc = patterns_doc(json!({"^c": body}));
        let mut arena = TypeArena::new();
        let ty = resolve_type(&registry, &mut arena, "counts", &patterns_of(&doc), Scope::top_level()).unwrap();
        assert_eq!(arena.describe(ty), "IndexMap<String, Option<Count>>");
    }

    #[test]
    fn nested_types_take_the_singular_base_name() {
        let doc = patterns_doc(json!({"^[a-z]+$": {"type": "object", "properties": {"v": {"type": "string"}}}}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        install_field(&registry, &mut arena, "entries", Some(&patterns_of(&doc)), target).unwrap();
        let field = arena.record(target).field("entries").unwrap();
        assert_eq!(arena.describe(field.ty), "IndexMap<String, Option<Entrie>>");
        let nested = arena.record_named("Entrie").unwrap();
        assert_eq!(arena.record(nested).parent, Some(target));
    }

    #[test]
    fn cyclic_values_resolve_to_the_enclosing_record() {
        let doc = SchemaDocument::new("node", json!({
            "type": "object",
            "properties": {"id": {"type": "string"}},
            "patternProperties": {"^child_": {"$ref": "#"}}
        }));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let root = registry.resolve(&mut arena, "node", &doc.root(), Scope::top_level()).unwrap();
        let Ty::Record(rid) = arena.get(root) else { panic!("expected a record") };
        let record = arena.record(*rid);
        let field = record.field("node").unwrap();
        assert_eq!(arena.map_value(field.ty), Some(root));
        assert!(pairs_are_consistent(&arena, record));
    }

    #[test]
    fn repeated_resolution_is_identity_stable() {
        let doc = SchemaDocument::new("doc", json!({
            "definitions": {"tag": {"type": "object", "properties": {"k": {"type": "string"}}}},
            "patternProperties": {
                "^a": {"$ref": "#/definitions/tag"},
                "^b": {"$ref": "#/definitions/tag"}
            }
        }));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let first = resolve_type(&registry, &mut arena, "tags", &patterns_of(&doc), Scope::top_level()).unwrap();
        let records = arena.record_count();
        let second = resolve_type(&registry, &mut arena, "tags", &patterns_of(&doc), Scope::top_level()).unwrap();
        assert_eq!(first, second);
        assert_eq!(arena.record_count(), records);
        assert_eq!(records, 1);
    }

    #[test]
    fn nested_errors_propagate_unchanged() {
        let doc = patterns_doc(json!({"^x": {"type": "string", "bogus": true}}));
        let registry = Registry::default();
        let mut arena = TypeArena::new();
        let target = empty_target(&mut arena);
        let err = install_field(&registry, &mut arena, "headers", Some(&patterns_of(&doc)), target).unwrap_err();
        assert_eq!(
            err,
            GenerationError::UnsupportedKeyword {
                path: patterns_of(&doc).id().child("^x"),
                keyword: "bogus".into(),
            }
        );
        assert!(arena.record(target).fields.is_empty());
    }
}
