use serde::Deserialize;

use crate::model::{EXTERNAL_ID_PROPERTY, EndpointIndexing};

/// Graph construction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphBuildConfig {
    /// Source field whose value becomes the external identifier of a
    /// feature's start vertex
    pub id_field: String,
    /// Skip features whose geometry or attributes cannot be converted
    /// instead of failing the whole build
    pub skip_invalid: bool,
    /// Indexing of newly created end vertices
    pub endpoint_indexing: EndpointIndexing,
    /// Emit a progress log line every this many features (0 disables)
    pub progress_interval: usize,
}

impl Default for GraphBuildConfig {
    fn default() -> Self {
        Self {
            id_field: EXTERNAL_ID_PROPERTY.to_string(),
            skip_invalid: false,
            endpoint_indexing: EndpointIndexing::PerEndpoint,
            progress_interval: 10_000,
        }
    }
}
