//! Read-only view over a parsed schema document.
//!
//! A [`SchemaNode`] is a borrowed `serde_json::Value` plus the identity of
//! the place it was defined at. Identities are `document#json-pointer`
//! strings; a `$ref` resolves to the identity of its target, so every reference
//! site of one definition shares a single identity (the dedup key).
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GenerationError, Result};

// ————————————————————————————————————————————————————————————————————————————
// IDENTITY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(document: &str, pointer: &str) -> Self {
        Self(format!("{document}#{pointer}"))
    }
    pub fn document(&self) -> &str {
        self.0.split_once('#').map(|(doc, _)| doc).unwrap_or(&self.0)
    }
    /// JSON pointer part, `""` for the document root.
    pub fn pointer(&self) -> &str {
        self.0.split_once('#').map(|(_, ptr)| ptr).unwrap_or("")
    }
    pub fn child(&self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        Self(format!("{}/{}", self.0, escaped))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT
// ————————————————————————————————————————————————————————————————————————————

/// One top-level schema, already parsed.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    name: String,
    root: Value,
}

impl SchemaDocument {
    pub fn new(name: impl Into<String>, root: Value) -> Self {
        Self { name: name.into(), root }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn root(&self) -> SchemaNode<'_> {
        SchemaNode { doc: self, value: &self.root, id: NodeId::new(&self.name, "") }
    }
    /// Look up a local JSON pointer (`""` is the root).
    pub fn at_pointer(&self, pointer: &str) -> Option<SchemaNode<'_>> {
        let value = self.root.pointer(pointer)?;
        Some(SchemaNode { doc: self, value, id: NodeId::new(&self.name, pointer) })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NODE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct SchemaNode<'a> {
    doc: &'a SchemaDocument,
    value: &'a Value,
    id: NodeId,
}

impl<'a> SchemaNode<'a> {
    pub fn id(&self) -> &NodeId {
        &self.id
    }
    pub fn value(&self) -> &'a Value {
        self.value
    }
    pub fn document(&self) -> &'a SchemaDocument {
        self.doc
    }
    pub fn as_object(&self) -> Option<&'a Map<String, Value>> {
        self.value.as_object()
    }
    pub fn has(&self, keyword: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(keyword))
    }
    /// Keyword names in document order. Empty for non-object nodes.
    pub fn keywords(&self) -> Vec<&'a str> {
        match self.value.as_object() {
            Some(map) => map.keys().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }
    pub fn keyword(&self, keyword: &str) -> Option<SchemaNode<'a>> {
        let value = self.as_object()?.get(keyword)?;
        Some(SchemaNode { doc: self.doc, value, id: self.id.child(keyword) })
    }
    pub fn str_keyword(&self, keyword: &str) -> Option<&'a str> {
        self.as_object()?.get(keyword)?.as_str()
    }
    /// Treat this node as a mapping of named sub-schemas, in document order.
    pub fn entries(&self) -> Result<Vec<(&'a str, SchemaNode<'a>)>> {
        let map = self
            .as_object()
            .ok_or_else(|| GenerationError::malformed(&self.id, "a mapping of sub-schemas"))?;
        Ok(map
            .iter()
            .map(|(key, value)| {
                (key.as_str(), SchemaNode { doc: self.doc, value, id: self.id.child(key) })
            })
            .collect())
    }
    /// Treat this node as a list of sub-schemas.
    pub fn entries_indexed(&self) -> Result<Vec<SchemaNode<'a>>> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| GenerationError::malformed(&self.id, "a list of sub-schemas"))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| SchemaNode { doc: self.doc, value, id: self.id.child(&i.to_string()) })
            .collect())
    }
    /// Follow a local `#`-relative reference from this node's document.
    pub fn resolve_ref(&self, reference: &str) -> Result<SchemaNode<'a>> {
        let unresolved = || GenerationError::UnresolvedReference {
            path: self.id.clone(),
            reference: reference.to_string(),
        };
        let pointer = reference.strip_prefix('#').ok_or_else(unresolved)?;
        self.doc.at_pointer(pointer).ok_or_else(unresolved)
    }
}
