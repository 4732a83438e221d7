//! Street network components - vertices and edges

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::model::PropertyValue;

/// Street graph vertex: one distinct endpoint location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetVertex {
    /// Colon-separated `lat:lon` key; empty for vertices that were never
    /// indexed (legacy end-vertex indexing)
    pub location_key: String,
    /// External identifier attached at creation time, never overwritten
    pub external_id: Option<String>,
    /// Vertex coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetEdge {
    /// Planar length of the segment in the source's coordinate units
    pub weight: f64,
    /// Source attributes, in graph schema order
    pub attributes: Vec<PropertyValue>,
}

impl StreetEdge {
    pub fn weight_dist(&self) -> f64 {
        self.weight
    }
}
