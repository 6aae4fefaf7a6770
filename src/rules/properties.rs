//! `properties`: one private member plus a plain getter/setter per entry.
use std::collections::HashSet;

use serde_json::Value;

use crate::arena::TypeArena;
use crate::error::Result;
use crate::ir::{Accessor, AccessorKind, DefaultValue, GeneratedProperty, RecordId, Ty, Visibility};
use crate::registry::Registry;
use crate::rules::Scope;
use crate::schema::SchemaNode;

pub fn install(
    registry: &Registry,
    arena: &mut TypeArena,
    props: &SchemaNode<'_>,
    required: &HashSet<String>,
    target: RecordId,
) -> Result<RecordId> {
    for (key, sub) in props.entries()? {
        let name = registry.namer().field_name(key, &sub);
        let ty = registry.resolve(arena, key, &sub, Scope::within(target))?;
        let default = match arena.get(ty) {
            Ty::List(_) => DefaultValue::EmptyList,
            _ => DefaultValue::Unset,
        };
        let required = required.contains(key)
            || sub.as_object().and_then(|m| m.get("required")) == Some(&Value::Bool(true));

        let record = arena.record_mut(target);
        record.add_field(GeneratedProperty {
            name: name.clone(),
            ty,
            json_name: (name != key).then(|| key.to_string()),
            required,
            default,
            visibility: Visibility::Private,
            key_patterns: Vec::new(),
            origin: sub.id().clone(),
        })?;
        if registry.config().include_accessors {
            record.add_accessor(Accessor {
                name: registry.namer().getter_name(&name),
                field: name.clone(),
                kind: AccessorKind::Getter { returns: ty },
                capabilities: Vec::new(),
            })?;
            record.add_accessor(Accessor {
                name: registry.namer().setter_name(&name),
                field: name.clone(),
                kind: AccessorKind::Setter { value: ty },
                capabilities: Vec::new(),
            })?;
        }
    }
    Ok(target)
}
