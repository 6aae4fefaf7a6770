//! Serializable view of a generated model, written by the CLI.
use serde::Serialize;

use crate::arena::TypeArena;
use crate::ir::{Accessor, AccessorKind, Capability, DefaultValue, GeneratedRecord, TypeId, Visibility};
use crate::schema::NodeId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReport {
    pub document: String,
    pub root: String,
    pub records: Vec<RecordReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport {
    pub name: String,
    pub origin: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub fields: Vec<FieldReport>,
    pub accessors: Vec<AccessorReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    pub required: bool,
    pub default: DefaultValue,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_patterns: Vec<String>,
    pub origin: NodeId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorReport {
    pub name: String,
    pub field: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

impl ModelReport {
    pub fn build(document: &str, arena: &TypeArena, root: TypeId) -> Self {
        Self {
            document: document.to_string(),
            root: arena.describe(root),
            records: arena.records().map(|(_, record)| record_report(arena, record)).collect(),
        }
    }
}

fn record_report(arena: &TypeArena, record: &GeneratedRecord) -> RecordReport {
    RecordReport {
        name: record.name.clone(),
        origin: record.origin.clone(),
        parent: record.parent.map(|p| arena.record(p).name.clone()),
        fields: record
            .fields
            .iter()
            .map(|f| FieldReport {
                name: f.name.clone(),
                ty: arena.describe(f.ty),
                json_name: f.json_name.clone(),
                required: f.required,
                default: f.default,
                visibility: f.visibility,
                key_patterns: f.key_patterns.clone(),
                origin: f.origin.clone(),
            })
            .collect(),
        accessors: record
            .accessors
            .iter()
            .map(|a| AccessorReport {
                name: a.name.clone(),
                field: a.field.clone(),
                signature: signature(arena, a),
                capabilities: a.capabilities.clone(),
            })
            .collect(),
    }
}

fn signature(arena: &TypeArena, accessor: &Accessor) -> String {
    let name = &accessor.name;
    match accessor.kind {
        AccessorKind::Getter { returns } => format!("fn {name}(&self) -> &{}", arena.describe(returns)),
        AccessorKind::Setter { value } => format!("fn {name}(&mut self, value: {})", arena.describe(value)),
        AccessorKind::EntrySetter { key, value } => format!(
            "fn {name}(&mut self, key: {}, value: {})",
            arena.describe(key),
            arena.describe(value)
        ),
    }
}
