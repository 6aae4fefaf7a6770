//! `type` primitives and literal sets (`enum` / `const`).
use serde_json::Value;

use crate::arena::TypeArena;
use crate::error::{GenerationError, Result};
use crate::ir::{Primitive, TypeId};
use crate::schema::SchemaNode;

pub fn resolve_type(arena: &mut TypeArena, node: &SchemaNode<'_>, declared: &str) -> Result<TypeId> {
    let primitive = match declared {
        "string" => Primitive::String,
        "integer" => Primitive::Integer,
        "number" => Primitive::Number,
        "boolean" => Primitive::Boolean,
        "null" => Primitive::Null,
        "any" => return Ok(arena.any()),
        _ => {
            return Err(GenerationError::malformed(
                node.id(),
                format!("a known type name, found `{declared}`"),
            ));
        }
    };
    Ok(arena.primitive(primitive))
}

/// Literal sets resolve to the one primitive all literals share, or to the
/// generic fallback when they are mixed.
pub fn resolve_enum(arena: &mut TypeArena, node: &SchemaNode<'_>) -> Result<TypeId> {
    let literals: Vec<&Value> = match (node.keyword("enum"), node.keyword("const")) {
        (Some(list), _) => list
            .value()
            .as_array()
            .ok_or_else(|| GenerationError::malformed(list.id(), "a list of literals"))?
            .iter()
            .collect(),
        (None, Some(single)) => vec![single.value()],
        (None, None) => Vec::new(),
    };
    let mut kinds = literals.iter().filter(|v| !v.is_null()).map(|v| literal_kind(v));
    let Some(first) = kinds.next() else {
        return Ok(arena.any());
    };
    let shared = kinds.try_fold(first, |acc, kind| match (acc, kind) {
        (Some(a), Some(b)) if a == b => Some(Some(a)),
        (Some(Primitive::Integer), Some(Primitive::Number))
        | (Some(Primitive::Number), Some(Primitive::Integer)) => Some(Some(Primitive::Number)),
        _ => None,
    });
    match shared.flatten() {
        Some(primitive) => Ok(arena.primitive(primitive)),
        None => Ok(arena.any()),
    }
}

fn literal_kind(value: &Value) -> Option<Primitive> {
    match value {
        Value::String(_) => Some(Primitive::String),
        Value::Bool(_) => Some(Primitive::Boolean),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Primitive::Integer),
        Value::Number(_) => Some(Primitive::Number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::{Primitive, Ty};
    use crate::rules::tests::resolve_root;
    use crate::schema::SchemaDocument;
    use serde_json::json;

    fn root_ty(schema: serde_json::Value) -> Ty {
        let doc = SchemaDocument::new("doc", schema);
        let (arena, ty) = resolve_root(&doc);
        arena.get(ty.unwrap()).clone()
    }

    #[test]
    fn enums_resolve_to_their_shared_primitive() {
        assert_eq!(root_ty(json!({"enum": ["on", "off"]})), Ty::Primitive(Primitive::String));
        assert_eq!(root_ty(json!({"enum": [1, 2.5, null]})), Ty::Primitive(Primitive::Number));
        assert_eq!(root_ty(json!({"const": true})), Ty::Primitive(Primitive::Boolean));
        assert_eq!(root_ty(json!({"enum": ["a", 1]})), Ty::Any);
    }

    #[test]
    fn unknown_type_names_are_malformed() {
        let doc = SchemaDocument::new("doc", json!({"type": "strnig"}));
        let (_, ty) = resolve_root(&doc);
        assert!(ty.unwrap_err().to_string().contains("strnig"));
    }
}
