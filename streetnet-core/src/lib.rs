//! Street network graphs from line datasets
//!
//! Line features (street segments) become edges; their endpoints become
//! vertices, deduplicated by the exact textual form of their coordinates.
//! Built graphs can be saved to a binary file and queried for shortest paths
//! between external identifiers such as census GEOIDs.

pub mod converter;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod store;

pub use converter::StreetNetworkConverter;
pub use error::{Error, MissingEndpoint};
pub use loading::{GraphBuildConfig, build_street_graph};
pub use model::StreetGraph;
pub use routing::{PathOutcome, ShortestPath, shortest_path};

/// Vertex identifier within a street graph
pub type VertexId = petgraph::graph::NodeIndex;
/// Edge identifier within a street graph
pub type EdgeId = petgraph::graph::EdgeIndex;
