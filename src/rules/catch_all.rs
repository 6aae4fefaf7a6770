//! Shared installer for open-ended map members (`patternProperties`,
//! `additionalProperties`).
//!
//! Installs one private map member plus a getter/setter pair bound to it,
//! both tagged as catch-all accessors.
use tracing::debug;

use crate::arena::TypeArena;
use crate::error::Result;
use crate::ir::{
    Accessor, AccessorKind, Capability, DefaultValue, GeneratedProperty, GeneratedRecord,
    Primitive, RecordId, TypeId, Visibility,
};
use crate::registry::Registry;
use crate::schema::NodeId;

#[derive(Debug, Clone)]
pub struct CatchAll<'s> {
    pub field: &'s str,
    pub value: TypeId,
    pub origin: &'s NodeId,
    pub key_patterns: Vec<String>,
}

pub fn install(
    registry: &Registry,
    arena: &mut TypeArena,
    target: RecordId,
    member: CatchAll<'_>,
) -> Result<RecordId> {
    let map = arena.map_of(member.value);
    let key = arena.primitive(Primitive::String);

    let mut getter = Accessor {
        name: registry.namer().getter_name(member.field),
        field: member.field.to_string(),
        kind: AccessorKind::Getter { returns: map },
        capabilities: Vec::new(),
    };
    registry.annotator().mark_catch_all_getter(&mut getter);
    let mut setter = Accessor {
        name: registry.namer().setter_name(member.field),
        field: member.field.to_string(),
        kind: AccessorKind::EntrySetter { key, value: member.value },
        capabilities: Vec::new(),
    };
    registry.annotator().mark_catch_all_setter(&mut setter);

    // Validate everything before touching the record so a failure leaves it as it was.
    let record = arena.record_mut(target);
    let mut staged = record.clone();
    staged.add_field(GeneratedProperty {
        name: member.field.to_string(),
        ty: map,
        json_name: None,
        required: false,
        default: DefaultValue::EmptyOrderedMap,
        visibility: Visibility::Private,
        key_patterns: member.key_patterns,
        origin: member.origin.clone(),
    })?;
    staged.add_accessor(getter)?;
    staged.add_accessor(setter)?;
    debug!(record = %staged.name, field = member.field, "installed catch-all member");
    *record = staged;
    Ok(target)
}

/// Every catch-all getter has a setter on the same backing member, and the
/// setter's value type is the element type the getter's map returns.
pub fn pairs_are_consistent(arena: &TypeArena, record: &GeneratedRecord) -> bool {
    let tagged = |cap| record.accessors.iter().filter(move |a: &&Accessor| a.has(cap));
    let getters: Vec<_> = tagged(Capability::CatchAllGetter).collect();
    let setters: Vec<_> = tagged(Capability::CatchAllSetter).collect();
    if getters.len() != setters.len() {
        return false;
    }
    getters.iter().all(|getter| {
        let AccessorKind::Getter { returns } = getter.kind else {
            return false;
        };
        let Some(element) = arena.map_value(returns) else {
            return false;
        };
        let backed = record.field(&getter.field).is_some_and(|f| f.ty == returns);
        let paired = setters.iter().filter(|s| s.field == getter.field).count() == 1
            && setters.iter().any(|s| {
                s.field == getter.field
                    && matches!(s.kind, AccessorKind::EntrySetter { value, .. } if value == element)
            });
        backed && paired
    })
}
