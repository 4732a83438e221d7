// Re-export key components
pub use crate::converter::StreetNetworkConverter;
pub use crate::loading::{
    BuildReport, CsvWktSource, FeatureSource, GeoJsonSource, GraphBuildConfig, MemorySource,
    SourceFeature, build_street_graph, build_street_graph_with_report, open_feature_source,
};
pub use crate::model::{
    EndpointIndexing, FieldDefinition, GraphSchema, PropertyType, PropertyValue, StreetEdge,
    StreetGraph, StreetVertex,
};
pub use crate::routing::{
    PathOutcome, ShortestPath, distance_matrix, shortest_path, shortest_path_between,
};
pub use crate::store::{BinaryGraphStore, GraphStore};

// Core types and errors
pub use crate::EdgeId;
pub use crate::VertexId;
pub use crate::{Error, MissingEndpoint};
