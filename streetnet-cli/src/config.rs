use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use streetnet_core::GraphBuildConfig;

/// Contents of a `--config` TOML file
///
/// ```toml
/// log_level = "debug"
///
/// [build]
/// id_field = "GEOID10"
/// skip_invalid = true
/// endpoint_indexing = "legacy"
/// ```
#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Filter used when `RUST_LOG` is not set
    pub log_level: String,
    pub build: GraphBuildConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            build: GraphBuildConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}
