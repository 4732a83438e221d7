use thiserror::Error;

use crate::model::PropertyType;

/// Which identifier of a path query could not be resolved to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEndpoint {
    Start,
    End,
    Both,
}

impl std::fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingEndpoint::Start => write!(f, "start"),
            MissingEndpoint::End => write!(f, "end"),
            MissingEndpoint::Both => write!(f, "start and end"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported geometry kind: {0} (expected LineString or MultiLineString)")]
    UnsupportedGeometryKind(&'static str),
    #[error("Geometry has no points")]
    EmptyGeometry,
    #[error("Feature has no geometry")]
    MissingGeometry,
    #[error("No graph loaded; build or load a graph first")]
    MissingGraph,
    #[error("No vertex found for {which} identifier (start: {start:?}, end: {end:?})")]
    VertexNotFound {
        which: MissingEndpoint,
        start: String,
        end: String,
    },
    #[error("No path between {start:?} and {end:?}")]
    PathNotFound { start: String, end: String },
    #[error("Failed to read source {path}: {reason}")]
    SourceRead { path: String, reason: String },
    #[error("Feature #{index}: {source}")]
    Feature {
        index: usize,
        #[source]
        source: Box<Error>,
    },
    #[error("Field {field:?} expects {expected} value, got {found}")]
    AttributeType {
        field: String,
        expected: PropertyType,
        found: &'static str,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
