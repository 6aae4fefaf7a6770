//! Read-only generation flags.
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationConfig {
    /// Install catch-all members for `patternProperties`.
    pub include_pattern_properties: bool,
    /// Install catch-all members for `additionalProperties`.
    pub include_additional_properties: bool,
    /// Emit plain getter/setter pairs for named properties.
    pub include_accessors: bool,
    /// Suffix stripped (once) to derive singular base names.
    pub plural_suffix: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            include_pattern_properties: true,
            include_additional_properties: true,
            include_accessors: true,
            plural_suffix: "s".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        crate::path_de::from_str_with_path(src)
    }
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&src)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}
