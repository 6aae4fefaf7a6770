//! Example-driven source type: derive a schema from sample JSON documents.
//!
//! Samples are observed into a small per-kind shape and joined (⊔) into one
//! least upper bound, then emitted as a schema the generator understands.
//! - Join is associative/commutative/idempotent, so sample order only
//!   affects member order (first sighting wins).
//! - Objects keep key order; arrays pool their elements into one item shape.
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub nullable: bool,
    pub boolean: bool,
    pub integer: bool,
    pub number: bool,
    pub string: bool,
    pub array: Option<Box<Shape>>,
    pub object: Option<ObjShape>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjShape {
    pub fields: IndexMap<String, FieldShape>,
    pub seen: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldShape {
    pub shape: Shape,
    /// objects in which the key was present with a non-null value
    pub non_null_in: u64,
}

// ------------------------------ Observe ---------------------------------- //

pub fn observe(v: &Value) -> Shape {
    match v {
        Value::Null => Shape { nullable: true, ..Shape::default() },
        Value::Bool(_) => Shape { boolean: true, ..Shape::default() },
        Value::Number(n) if n.is_i64() || n.is_u64() => Shape { integer: true, ..Shape::default() },
        Value::Number(_) => Shape { number: true, ..Shape::default() },
        Value::String(_) => Shape { string: true, ..Shape::default() },
        Value::Array(xs) => {
            let item = xs.iter().map(observe).fold(Shape::default(), |acc, s| join(&acc, &s));
            Shape { array: Some(Box::new(item)), ..Shape::default() }
        }
        Value::Object(map) => Shape { object: Some(observe_object(map)), ..Shape::default() },
    }
}

fn observe_object(map: &Map<String, Value>) -> ObjShape {
    let fields = map
        .iter()
        .map(|(k, v)| {
            let non_null_in = u64::from(!v.is_null());
            (k.clone(), FieldShape { shape: observe(v), non_null_in })
        })
        .collect();
    ObjShape { fields, seen: 1 }
}

// -------------------------------- Join (⊔) -------------------------------- //

pub fn join(a: &Shape, b: &Shape) -> Shape {
    Shape {
        nullable: a.nullable || b.nullable,
        boolean: a.boolean || b.boolean,
        integer: a.integer || b.integer,
        number: a.number || b.number,
        string: a.string || b.string,
        array: match (&a.array, &b.array) {
            (None, None) => None,
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (Some(x), Some(y)) => Some(Box::new(join(x, y))),
        },
        object: match (&a.object, &b.object) {
            (None, None) => None,
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (Some(x), Some(y)) => Some(join_obj(x, y)),
        },
    }
}

fn join_obj(a: &ObjShape, b: &ObjShape) -> ObjShape {
    let mut out = ObjShape { fields: a.fields.clone(), seen: a.seen + b.seen };
    for (k, fb) in &b.fields {
        match out.fields.get_mut(k) {
            Some(fa) => {
                fa.shape = join(&fa.shape, &fb.shape);
                fa.non_null_in += fb.non_null_in;
            }
            None => {
                out.fields.insert(k.clone(), fb.clone());
            }
        }
    }
    out
}

// ------------------------------- Emission --------------------------------- //

/// Emit a schema. Mixed kinds keep the most structured one
/// (object > array > string > number > integer > boolean); a value seen only
/// as `null` is left untyped.
pub fn emit_schema(shape: &Shape) -> Value {
    if let Some(obj) = &shape.object {
        let mut props = Map::new();
        let mut required = Vec::new();
        for (k, f) in &obj.fields {
            props.insert(k.clone(), emit_schema(&f.shape));
            if f.non_null_in == obj.seen {
                required.push(Value::from(k.clone()));
            }
        }
        let mut out = json!({ "type": "object", "properties": props });
        if !required.is_empty() {
            out["required"] = Value::Array(required);
        }
        return out;
    }
    if let Some(item) = &shape.array {
        return json!({ "type": "array", "items": emit_schema(item) });
    }
    let ty = if shape.string {
        "string"
    } else if shape.number {
        "number"
    } else if shape.integer {
        "integer"
    } else if shape.boolean {
        "boolean"
    } else {
        return json!({});
    };
    json!({ "type": ty })
}

/// Convenience: observe every sample, join, emit.
pub fn schema_from_examples<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let shape = values.into_iter().fold(Shape::default(), |acc, v| join(&acc, &observe(v)));
    emit_schema(&shape)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn objects_merge_and_requiredness_is_non_null() {
        let a = json!({"x": 1, "y": "a"});
        let b = json!({"x": 2, "y": null, "z": true});
        let schema = schema_from_examples([&a, &b]);
        assert_eq!(schema, json!({
            "type": "object",
            "properties": {
                "x": {"type": "integer"},
                "y": {"type": "string"},
                "z": {"type": "boolean"}
            },
            "required": ["x"]
        }));
    }

    #[test]
    fn integers_widen_to_numbers() {
        let schema = schema_from_examples([&json!([1, 2.5])]);
        assert_eq!(schema, json!({"type": "array", "items": {"type": "number"}}));
    }

    #[test]
    fn join_laws_idempotent_commutative_associative() {
        let a = observe(&json!({"k": [1, "a"]}));
        let b = observe(&json!({"k": [null], "j": 1.5}));
        let c = observe(&json!({"j": {"deep": true}}));

        assert_eq!(emit_schema(&join(&a, &a)), emit_schema(&a));
        assert_eq!(emit_schema(&join(&a, &b)).to_string().len(), emit_schema(&join(&b, &a)).to_string().len());
        assert_eq!(emit_schema(&join(&join(&a, &b), &c)), emit_schema(&join(&a, &join(&b, &c))));
    }

    #[test]
    fn null_only_values_stay_untyped() {
        assert_eq!(schema_from_examples([&Value::Null]), json!({}));
    }
}
