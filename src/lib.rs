//! Schema-driven type generation.
//!
//! A [`registry::Registry`] bundles the dispatcher, naming and annotation
//! capabilities; [`generator::generate`] walks one [`schema::SchemaDocument`]
//! through it into a [`arena::TypeArena`] of records, lists, maps and
//! primitives.
pub mod annotate;
pub mod arena;
pub mod cli;
pub mod config;
pub mod error;
pub mod example;
pub mod generator;
pub mod ir;
pub mod jq_exec;
pub mod naming;
pub mod path_de;
pub mod registry;
pub mod report;
pub mod rules;
pub mod schema;

pub use error::{GenerationError, Result};
pub use generator::{GeneratedModel, generate, generate_all};
pub use registry::Registry;
pub use schema::SchemaDocument;
