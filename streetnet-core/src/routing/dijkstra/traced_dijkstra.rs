use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::model::StreetGraph;

/// Result of a single-source search: best known distances and the edge each
/// reached vertex was entered through
#[derive(Debug, Clone)]
pub(crate) struct SearchTree {
    pub(crate) start: NodeIndex,
    pub(crate) distances: HashMap<NodeIndex, f64>,
    predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
}

impl SearchTree {
    /// Vertices and edges from the start to `target`, or `None` if the
    /// target was not reached
    pub(crate) fn path_to(&self, target: NodeIndex) -> Option<(Vec<NodeIndex>, Vec<EdgeIndex>)> {
        if !self.distances.contains_key(&target) {
            return None;
        }

        let mut vertices = vec![target];
        let mut edges = Vec::new();
        let mut current = target;
        while current != self.start {
            let &(prev, edge) = self.predecessors.get(&current)?;
            vertices.push(prev);
            edges.push(edge);
            current = prev;
        }
        vertices.reverse(); // Now path is from start to target
        edges.reverse();
        Some((vertices, edges))
    }
}

/// Dijkstra's algorithm over `weight_dist`, recording predecessors.
/// Stops early once `target` is settled.
pub(crate) fn dijkstra_tree(
    graph: &StreetGraph,
    start: NodeIndex,
    target: Option<NodeIndex>,
) -> SearchTree {
    let estimated_nodes = graph.vertex_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node)
            && cost > best
        {
            continue;
        }

        if target == Some(node) {
            break;
        }

        for edge in graph.edges(node) {
            // Undirected: the neighbour is whichever endpoint is not `node`
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            let next_cost = cost + edge.weight().weight;

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, (node, edge.id()));
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, (node, edge.id()));
                    }
                }
            }
        }
    }

    SearchTree {
        start,
        distances,
        predecessors,
    }
}
