//! Capability tagging for accessors.
use crate::ir::{Accessor, Capability};

/// Attaches capability tags consumed later by a serialization backend.
pub trait Annotator: Send + Sync {
    fn mark_catch_all_getter(&self, accessor: &mut Accessor);
    fn mark_catch_all_setter(&self, accessor: &mut Accessor);
}

/// Backend-neutral tagging: records the capability on the accessor.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapabilityAnnotator;

impl Annotator for CapabilityAnnotator {
    fn mark_catch_all_getter(&self, accessor: &mut Accessor) {
        tag(accessor, Capability::CatchAllGetter);
    }
    fn mark_catch_all_setter(&self, accessor: &mut Accessor) {
        tag(accessor, Capability::CatchAllSetter);
    }
}

fn tag(accessor: &mut Accessor, capability: Capability) {
    if !accessor.has(capability) {
        accessor.capabilities.push(capability);
    }
}
