//! Type arena and dedup cache for one document.
//!
//! Types and records live in flat vectors and are addressed by handle, so a
//! record that refers to itself is an index lookup, never an ownership cycle.
//! The node cache is insert-if-absent: once a schema identity has a type it
//! keeps it for the rest of the run.
//!
//! Nodes whose rule is still running are kept on a resolution stack. A cycle
//! that re-enters one of them before it has a type either promotes it to a
//! wrapper record (maps, lists) or is a reference cycle with nothing concrete
//! in it.
use std::collections::HashMap;

use crate::ir::{GeneratedRecord, Primitive, RecordId, Ty, TypeId};
use crate::schema::NodeId;

#[derive(Debug, Default, Clone)]
pub struct TypeArena {
    types: Vec<Ty>,
    interned: HashMap<Ty, TypeId>,
    records: Vec<GeneratedRecord>,
    by_node: HashMap<NodeId, TypeId>,
    record_names: HashMap<String, RecordId>,
    resolving: Vec<Frame>,
    promoted: HashMap<NodeId, RecordId>,
}

/// A node whose rule is running, innermost last.
#[derive(Debug, Clone)]
pub struct Frame {
    pub node: NodeId,
    pub name: String,
    pub parent: Option<RecordId>,
    /// The node is a bare `$ref` and contributes no type of its own.
    pub reference: bool,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------- structural types -------------------------- //

    /// Intern a structural type; equal kinds share one handle.
    pub fn intern(&mut self, ty: Ty) -> TypeId {
        if let Some(id) = self.interned.get(&ty) {
            return *id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }
    pub fn any(&mut self) -> TypeId {
        self.intern(Ty::Any)
    }
    pub fn primitive(&mut self, p: Primitive) -> TypeId {
        self.intern(Ty::Primitive(p))
    }
    pub fn map_of(&mut self, value: TypeId) -> TypeId {
        self.intern(Ty::Map(value))
    }
    pub fn list_of(&mut self, item: TypeId) -> TypeId {
        self.intern(Ty::List(item))
    }
    pub fn get(&self, id: TypeId) -> &Ty {
        &self.types[id.0 as usize]
    }
    /// Value type of a map, `None` for anything else.
    pub fn map_value(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            Ty::Map(value) => Some(*value),
            _ => None,
        }
    }

    // ------------------------------ dedup cache ---------------------------- //

    pub fn lookup(&self, node: &NodeId) -> Option<TypeId> {
        self.by_node.get(node).copied()
    }

    /// Bind `node` to `ty` unless it is already bound; returns the binding
    /// that is in effect afterwards.
    pub fn remember(&mut self, node: NodeId, ty: TypeId) -> TypeId {
        *self.by_node.entry(node).or_insert(ty)
    }

    // ---------------------------- resolution stack ------------------------- //

    pub fn enter(&mut self, frame: Frame) {
        self.resolving.push(frame);
    }
    pub fn leave(&mut self, node: &NodeId) {
        if self.resolving.last().is_some_and(|frame| &frame.node == node) {
            self.resolving.pop();
        }
    }
    /// The frames from `node`'s own frame to the innermost one, when `node`
    /// is still being resolved.
    pub fn in_progress(&self, node: &NodeId) -> Option<&[Frame]> {
        let start = self.resolving.iter().position(|frame| &frame.node == node)?;
        Some(&self.resolving[start..])
    }

    /// Declare a wrapper record for a node re-entered through a cycle. Its
    /// member is filled in by [`TypeArena::take_promoted`]'s caller once the
    /// node's own type is known.
    pub fn promote(&mut self, name: &str, node: NodeId, parent: Option<RecordId>) -> TypeId {
        let (record, ty) = self.declare_record(name, node.clone(), parent);
        self.promoted.insert(node, record);
        ty
    }
    pub fn take_promoted(&mut self, node: &NodeId) -> Option<RecordId> {
        self.promoted.remove(node)
    }

    // -------------------------------- records ------------------------------ //

    /// Declare a new record and bind its origin node to it right away, so a
    /// cycle back into `origin` finds the record instead of recursing.
    ///
    /// The name is made unique within the document (`Item`, `Item2`, ...).
    pub fn declare_record(
        &mut self,
        name: &str,
        origin: NodeId,
        parent: Option<RecordId>,
    ) -> (RecordId, TypeId) {
        if let Some(existing) = self.lookup(&origin) {
            if let Ty::Record(rid) = self.get(existing) {
                return (*rid, existing);
            }
        }
        let unique = self.unique_record_name(name);
        let rid = RecordId(self.records.len() as u32);
        self.records.push(GeneratedRecord::new(unique.clone(), origin.clone(), parent));
        self.record_names.insert(unique, rid);
        let ty = self.intern(Ty::Record(rid));
        let bound = self.remember(origin, ty);
        (rid, bound)
    }

    fn unique_record_name(&self, name: &str) -> String {
        if !self.record_names.contains_key(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !self.record_names.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    pub fn record(&self, id: RecordId) -> &GeneratedRecord {
        &self.records[id.0 as usize]
    }
    pub fn record_mut(&mut self, id: RecordId) -> &mut GeneratedRecord {
        &mut self.records[id.0 as usize]
    }
    pub fn record_named(&self, name: &str) -> Option<RecordId> {
        self.record_names.get(name).copied()
    }
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &GeneratedRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (RecordId(i as u32), r))
    }
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Render a type the way generated Rust would spell it.
    pub fn describe(&self, id: TypeId) -> String {
        match self.get(id) {
            Ty::Primitive(Primitive::String) => "String".to_string(),
            Ty::Primitive(Primitive::Integer) => "i64".to_string(),
            Ty::Primitive(Primitive::Number) => "f64".to_string(),
            Ty::Primitive(Primitive::Boolean) => "bool".to_string(),
            Ty::Primitive(Primitive::Null) => "()".to_string(),
            Ty::Record(rid) => self.record(*rid).name.clone(),
            Ty::List(item) => format!("Vec<{}>", self.describe(*item)),
            Ty::Map(value) => format!("IndexMap<String, Option<{}>>", self.describe(*value)),
            Ty::Any => "serde_json::Value".to_string(),
        }
    }
}
