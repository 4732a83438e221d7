//! This module is responsible for reading line features from various
//! sources (GeoJSON, CSV with WKT geometries, memory) and building a
//! street graph from them.

mod builder;
mod config;
mod csv_source;
mod geojson_source;
pub mod geometry;
mod source;

pub use builder::{BuildReport, GraphBuilder, build_street_graph, build_street_graph_with_report};
pub use config::GraphBuildConfig;
pub use csv_source::CsvWktSource;
pub use geojson_source::GeoJsonSource;
pub use source::{FeatureIter, FeatureSource, MemorySource, SourceFeature, open_feature_source};
