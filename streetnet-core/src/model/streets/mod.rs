//! Street network model: deduplicated endpoint vertices and segment edges

pub mod components;
pub mod network;
pub mod registry;

pub use components::{StreetEdge, StreetVertex};
pub use network::{StreetGraph, location_key};
pub use registry::{EndpointIndexing, VertexRegistry};
