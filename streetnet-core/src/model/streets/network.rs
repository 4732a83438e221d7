//! Street network graph with its vertex registry and property schema

use std::fmt::Write as _;

use geo::Point;
use petgraph::graph::{EdgeIndex, EdgeReference, NodeIndex, UnGraph};

use super::components::{StreetEdge, StreetVertex};
use super::registry::{EndpointIndexing, VertexRegistry};
use crate::model::{GraphSchema, PropertyValue};

/// Undirected street graph
///
/// Vertices are deduplicated endpoint locations, edges are input features.
/// Parallel edges between the same pair of vertices are kept. The graph is
/// only mutated by the builder; afterwards it is read-only.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub(crate) graph: UnGraph<StreetVertex, StreetEdge>,
    pub(crate) registry: VertexRegistry,
    pub(crate) schema: GraphSchema,
    pub(crate) indexing: EndpointIndexing,
}

impl StreetGraph {
    pub(crate) fn new(schema: GraphSchema, indexing: EndpointIndexing, capacity: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(capacity, capacity),
            registry: VertexRegistry::with_capacity(capacity),
            schema,
            indexing,
        }
    }

    /// Reassembles a graph from stored parts and rebuilds the lookup indices
    pub(crate) fn from_parts(
        graph: UnGraph<StreetVertex, StreetEdge>,
        schema: GraphSchema,
        indexing: EndpointIndexing,
    ) -> Self {
        let registry = VertexRegistry::rebuild(&graph);
        Self {
            graph,
            registry,
            schema,
            indexing,
        }
    }

    /// Resolves the start point of a feature, attaching `external_id` only
    /// if the vertex is new
    pub(crate) fn resolve_start(
        &mut self,
        location_key: &str,
        external_id: Option<&str>,
        geometry: Point<f64>,
    ) -> NodeIndex {
        self.registry
            .resolve_or_create(&mut self.graph, location_key, external_id, geometry)
    }

    /// Resolves the end point of a feature
    pub(crate) fn resolve_end(&mut self, location_key: &str, geometry: Point<f64>) -> NodeIndex {
        match self.indexing {
            EndpointIndexing::PerEndpoint => {
                self.registry
                    .resolve_or_create(&mut self.graph, location_key, None, geometry)
            }
            EndpointIndexing::Legacy => match self.registry.find_by_key(location_key) {
                Some(node) => node,
                None => self.registry.insert_unindexed(&mut self.graph, geometry),
            },
        }
    }

    pub(crate) fn add_edge(&mut self, start: NodeIndex, end: NodeIndex, edge: StreetEdge) -> EdgeIndex {
        self.graph.add_edge(start, end, edge)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    pub fn indexing(&self) -> EndpointIndexing {
        self.indexing
    }

    pub fn vertex(&self, node: NodeIndex) -> Option<&StreetVertex> {
        self.graph.node_weight(node)
    }

    pub fn edge(&self, edge: EdgeIndex) -> Option<&StreetEdge> {
        self.graph.edge_weight(edge)
    }

    /// Endpoints of an edge as (start, end)
    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    /// Edges incident to a vertex, in insertion order
    pub fn edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, StreetEdge>> {
        self.graph.edges(node)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (NodeIndex, &StreetVertex)> {
        self.graph
            .node_indices()
            .map(move |node| (node, &self.graph[node]))
    }

    pub fn find_vertex_by_key(&self, location_key: &str) -> Option<NodeIndex> {
        self.registry.find_by_key(location_key)
    }

    pub fn find_vertex_by_external_id(&self, external_id: &str) -> Option<NodeIndex> {
        self.registry.find_by_external_id(external_id)
    }

    /// Value of a named source attribute on an edge
    pub fn edge_attribute(&self, edge: EdgeIndex, name: &str) -> Option<&PropertyValue> {
        let idx = self.schema.edge_field_index(name)?;
        self.graph.edge_weight(edge)?.attributes.get(idx)
    }

    /// Human readable listing of the declared properties
    pub fn list_properties(&self) -> String {
        let properties = self.schema.properties();
        let width = properties
            .iter()
            .map(|(name, _, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (name, kind, ty) in properties {
            let _ = writeln!(out, "{name:<width$} ({kind:<6}) (type: {ty})");
        }
        out
    }
}

/// Canonical location key of a point: `"<lat>:<lon>"`, where both parts use
/// the shortest decimal form that round-trips the `f64`
pub fn location_key(point: Point<f64>) -> String {
    format!("{}:{}", point.y(), point.x())
}
