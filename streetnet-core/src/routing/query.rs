//! Shortest path queries between external identifiers

use petgraph::graph::{EdgeIndex, NodeIndex};

use super::dijkstra::dijkstra_tree;
use crate::model::StreetGraph;
use crate::{Error, MissingEndpoint};

/// A minimum-weight path between two vertices
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Sum of `weight_dist` along the path
    pub distance: f64,
    /// Vertices from start to end, both included
    pub vertices: Vec<NodeIndex>,
    /// Edges taken, `vertices.len() - 1` of them
    pub edges: Vec<EdgeIndex>,
}

/// Result of a path query
///
/// Unknown identifiers and disconnected vertices are expected outcomes, so
/// they are reported here instead of as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    Found(ShortestPath),
    /// Both identifiers resolve but lie in different components
    Unreachable,
    /// At least one identifier has no vertex
    NotFound(MissingEndpoint),
}

impl PathOutcome {
    pub fn path(&self) -> Option<&ShortestPath> {
        match self {
            PathOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    /// Distance of a found path; `f64::INFINITY` when unreachable
    pub fn distance(&self) -> Option<f64> {
        match self {
            PathOutcome::Found(path) => Some(path.distance),
            PathOutcome::Unreachable => Some(f64::INFINITY),
            PathOutcome::NotFound(_) => None,
        }
    }

    /// Converts the outcome into a `Result`, naming the queried identifiers
    /// in the error
    ///
    /// # Errors
    ///
    /// `VertexNotFound` for unresolved identifiers, `PathNotFound` for
    /// unreachable ones
    pub fn into_result(self, start: &str, end: &str) -> Result<ShortestPath, Error> {
        match self {
            PathOutcome::Found(path) => Ok(path),
            PathOutcome::Unreachable => Err(Error::PathNotFound {
                start: start.to_string(),
                end: end.to_string(),
            }),
            PathOutcome::NotFound(which) => Err(Error::VertexNotFound {
                which,
                start: start.to_string(),
                end: end.to_string(),
            }),
        }
    }
}

/// Shortest path between the vertices carrying two external identifiers
pub fn shortest_path(graph: &StreetGraph, start_id: &str, end_id: &str) -> PathOutcome {
    let start = graph.find_vertex_by_external_id(start_id);
    let end = graph.find_vertex_by_external_id(end_id);

    match (start, end) {
        (Some(start), Some(end)) => shortest_path_between(graph, start, end),
        (None, Some(_)) => PathOutcome::NotFound(MissingEndpoint::Start),
        (Some(_), None) => PathOutcome::NotFound(MissingEndpoint::End),
        (None, None) => PathOutcome::NotFound(MissingEndpoint::Both),
    }
}

/// Shortest path between two vertices
pub fn shortest_path_between(graph: &StreetGraph, start: NodeIndex, end: NodeIndex) -> PathOutcome {
    match (graph.vertex(start), graph.vertex(end)) {
        (Some(_), Some(_)) => {}
        (None, Some(_)) => return PathOutcome::NotFound(MissingEndpoint::Start),
        (Some(_), None) => return PathOutcome::NotFound(MissingEndpoint::End),
        (None, None) => return PathOutcome::NotFound(MissingEndpoint::Both),
    }

    let tree = dijkstra_tree(graph, start, Some(end));
    let Some(&distance) = tree.distances.get(&end) else {
        return PathOutcome::Unreachable;
    };

    match tree.path_to(end) {
        Some((vertices, edges)) => PathOutcome::Found(ShortestPath {
            distance,
            vertices,
            edges,
        }),
        None => PathOutcome::Unreachable,
    }
}
