// Strongly-typed model of the generated types. Handles only; no serde_json::Value here.
use serde::Serialize;

use crate::error::{GenerationError, Result};
use crate::schema::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

/// A resolved type. Structural kinds are interned by the arena, so equal
/// descriptors always share one [`TypeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Primitive(Primitive),
    Record(RecordId),
    List(TypeId),
    /// String keys in insertion order; values are stored boxed, so a `null`
    /// entry is representable whatever the value type.
    Map(TypeId),
    /// generic/untyped fallback
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValue {
    Unset,
    EmptyList,
    /// empty, insertion-order-preserving map
    EmptyOrderedMap,
}

/// Cross-cutting tags read by serialization backends. The generator never
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    CatchAllGetter,
    CatchAllSetter,
}

/// A named member of a generated record.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProperty {
    pub name: String,
    pub ty: TypeId,
    /// Key in the JSON document when it differs from `name`.
    pub json_name: Option<String>,
    pub required: bool,
    pub default: DefaultValue,
    pub visibility: Visibility,
    /// Key patterns a catch-all member accepts (empty = any key).
    pub key_patterns: Vec<String>,
    pub origin: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    /// `fn field(&self) -> &T`
    Getter { returns: TypeId },
    /// `fn set_field(&mut self, value: T)`
    Setter { value: TypeId },
    /// `fn set_field(&mut self, key: String, value: V)`, inserts or overwrites one entry
    EntrySetter { key: TypeId, value: TypeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub name: String,
    /// Backing member.
    pub field: String,
    pub kind: AccessorKind,
    pub capabilities: Vec<Capability>,
}

impl Accessor {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRecord {
    pub name: String,
    pub origin: NodeId,
    /// Record the schema node was nested in, if any.
    pub parent: Option<RecordId>,
    pub fields: Vec<GeneratedProperty>,
    pub accessors: Vec<Accessor>,
}

impl GeneratedRecord {
    pub fn new(name: impl Into<String>, origin: NodeId, parent: Option<RecordId>) -> Self {
        Self { name: name.into(), origin, parent, fields: Vec::new(), accessors: Vec::new() }
    }
    pub fn field(&self, name: &str) -> Option<&GeneratedProperty> {
        self.fields.iter().find(|f| f.name == name)
    }
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name == name)
    }
    /// Add a member; a name that is already taken is a collision, never an overwrite.
    pub fn add_field(&mut self, field: GeneratedProperty) -> Result<()> {
        if let Some(existing) = self.field(&field.name) {
            return Err(self.collision(&field.name, &existing.origin, &field.origin));
        }
        self.fields.push(field);
        Ok(())
    }
    /// Add an accessor; its backing field must already be a member.
    pub fn add_accessor(&mut self, accessor: Accessor) -> Result<()> {
        let origin = match self.field(&accessor.field) {
            Some(field) => field.origin.clone(),
            None => return Err(GenerationError::MissingNode { path: self.origin.child(&accessor.field) }),
        };
        if let Some(existing) = self.accessor(&accessor.name) {
            let existing_origin = self
                .field(&existing.field)
                .map(|f| f.origin.clone())
                .unwrap_or_else(|| self.origin.clone());
            return Err(self.collision(&accessor.name, &existing_origin, &origin));
        }
        self.accessors.push(accessor);
        Ok(())
    }
    fn collision(&self, member: &str, existing: &NodeId, new: &NodeId) -> GenerationError {
        GenerationError::NameCollision {
            record: self.name.clone(),
            member: member.to_string(),
            existing_origin: existing.clone(),
            new_origin: new.clone(),
        }
    }
    pub fn accessors_of<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Accessor> + 'a {
        self.accessors.iter().filter(move |a| a.field == field)
    }
}
