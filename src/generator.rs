//! Per-document generation runs.
//!
//! Each document gets its own arena; documents share nothing but the
//! read-only registry, so they are generated in parallel. A failed document
//! yields no model at all.
use rayon::prelude::*;
use tracing::{debug, info};

use crate::arena::TypeArena;
use crate::error::Result;
use crate::ir::TypeId;
use crate::registry::Registry;
use crate::report::ModelReport;
use crate::rules::{Scope, catch_all};
use crate::schema::SchemaDocument;

#[derive(Debug, Clone)]
pub struct GeneratedModel {
    document: String,
    arena: TypeArena,
    root: TypeId,
}

impl GeneratedModel {
    pub fn document(&self) -> &str {
        &self.document
    }
    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }
    pub fn root(&self) -> TypeId {
        self.root
    }
    pub fn report(&self) -> ModelReport {
        ModelReport::build(&self.document, &self.arena, self.root)
    }
}

/// Generate the types of one document: its root, then every named
/// definition (so unreferenced definitions still produce types).
pub fn generate(registry: &Registry, doc: &SchemaDocument) -> Result<GeneratedModel> {
    let mut arena = TypeArena::new();
    let root_node = doc.root();
    let root = registry.resolve(&mut arena, doc.name(), &root_node, Scope::top_level())?;
    for keyword in ["definitions", "$defs"] {
        let Some(defs) = root_node.keyword(keyword) else {
            continue;
        };
        for (name, def) in defs.entries()? {
            debug!(definition = name, "resolving definition");
            registry.resolve(&mut arena, name, &def, Scope::top_level())?;
        }
    }
    debug_assert!(arena.records().all(|(_, r)| catch_all::pairs_are_consistent(&arena, r)));
    info!(document = doc.name(), records = arena.record_count(), "generated");
    Ok(GeneratedModel { document: doc.name().to_string(), arena, root })
}

/// Generate several independent documents in parallel; results come back in
/// input order.
pub fn generate_all(registry: &Registry, docs: &[SchemaDocument]) -> Vec<Result<GeneratedModel>> {
    docs.par_iter().map(|doc| generate(registry, doc)).collect()
}
