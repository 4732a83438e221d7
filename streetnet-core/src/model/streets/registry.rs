//! Location-keyed vertex registry
//!
//! Guarantees at most one indexed vertex per location key. Both indices are
//! hash maps, so resolving an endpoint does not scan the graph.

use geo::Point;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use super::components::{StreetEdge, StreetVertex};

/// How newly created end vertices are indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointIndexing {
    /// Every created vertex is indexed under its own location key
    #[default]
    PerEndpoint,
    /// Reproduces graphs written by `shp2gt`: an end vertex created by a
    /// feature is never indexed and keeps an empty location key, so later
    /// features sharing that location create a fresh vertex
    Legacy,
}

#[derive(Debug, Clone, Default)]
pub struct VertexRegistry {
    by_key: HashMap<String, NodeIndex>,
    by_external_id: HashMap<String, NodeIndex>,
}

impl VertexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_key: HashMap::with_capacity(capacity),
            by_external_id: HashMap::with_capacity(capacity / 2),
        }
    }

    /// Returns the vertex registered under `location_key`, creating it on a
    /// miss. `external_id` is only used when a vertex is created; on a hit it
    /// is ignored.
    pub fn resolve_or_create(
        &mut self,
        graph: &mut UnGraph<StreetVertex, StreetEdge>,
        location_key: &str,
        external_id: Option<&str>,
        geometry: Point<f64>,
    ) -> NodeIndex {
        if let Some(&existing) = self.by_key.get(location_key) {
            return existing;
        }

        let external_id = external_id.filter(|id| !id.is_empty());
        let node = graph.add_node(StreetVertex {
            location_key: location_key.to_string(),
            external_id: external_id.map(str::to_string),
            geometry,
        });
        self.by_key.insert(location_key.to_string(), node);
        if let Some(id) = external_id {
            self.index_external_id(id, node);
        }
        node
    }

    /// Creates a vertex that is reachable by index only (legacy end vertices)
    pub fn insert_unindexed(
        &mut self,
        graph: &mut UnGraph<StreetVertex, StreetEdge>,
        geometry: Point<f64>,
    ) -> NodeIndex {
        graph.add_node(StreetVertex {
            location_key: String::new(),
            external_id: None,
            geometry,
        })
    }

    pub fn find_by_key(&self, location_key: &str) -> Option<NodeIndex> {
        self.by_key.get(location_key).copied()
    }

    pub fn find_by_external_id(&self, external_id: &str) -> Option<NodeIndex> {
        self.by_external_id.get(external_id).copied()
    }

    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    /// Rebuilds both indices from stored vertices, in vertex order
    pub(crate) fn rebuild(graph: &UnGraph<StreetVertex, StreetEdge>) -> Self {
        let mut registry = Self::with_capacity(graph.node_count());
        for node in graph.node_indices() {
            let vertex = &graph[node];
            if !vertex.location_key.is_empty() {
                registry
                    .by_key
                    .entry(vertex.location_key.clone())
                    .or_insert(node);
            }
            if let Some(id) = &vertex.external_id {
                registry.index_external_id(id, node);
            }
        }
        registry
    }

    // First vertex created with an identifier keeps it
    fn index_external_id(&mut self, external_id: &str, node: NodeIndex) {
        if let Entry::Vacant(entry) = self.by_external_id.entry(external_id.to_string()) {
            entry.insert(node);
        }
    }
}
