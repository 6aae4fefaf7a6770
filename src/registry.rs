//! The capability bundle threaded through every resolution step.
//!
//! Built once per run and only ever borrowed, so one registry can serve
//! several documents generated in parallel.
use crate::annotate::{Annotator, CapabilityAnnotator};
use crate::arena::TypeArena;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::ir::TypeId;
use crate::naming::{DefaultNamer, Namer};
use crate::rules::{Dispatch, RuleDispatcher, Scope};
use crate::schema::SchemaNode;

pub struct Registry {
    dispatcher: Box<dyn Dispatch>,
    namer: Box<dyn Namer>,
    annotator: Box<dyn Annotator>,
    config: GenerationConfig,
}

impl Registry {
    pub fn new(config: GenerationConfig) -> Self {
        Self::with_parts(
            Box::new(RuleDispatcher),
            Box::new(DefaultNamer),
            Box::new(CapabilityAnnotator),
            config,
        )
    }
    pub fn with_parts(
        dispatcher: Box<dyn Dispatch>,
        namer: Box<dyn Namer>,
        annotator: Box<dyn Annotator>,
        config: GenerationConfig,
    ) -> Self {
        Self { dispatcher, namer, annotator, config }
    }

    pub fn dispatcher(&self) -> &dyn Dispatch {
        self.dispatcher.as_ref()
    }
    pub fn namer(&self) -> &dyn Namer {
        self.namer.as_ref()
    }
    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Shorthand for `self.dispatcher().resolve(self, ...)`.
    pub fn resolve(
        &self,
        arena: &mut TypeArena,
        name: &str,
        node: &SchemaNode<'_>,
        scope: Scope,
    ) -> Result<TypeId> {
        self.dispatcher.resolve(self, arena, name, node, scope)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("config", &self.config).finish_non_exhaustive()
    }
}
