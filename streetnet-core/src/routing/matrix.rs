use rayon::prelude::*;

use super::dijkstra::dijkstra_tree;
use crate::model::StreetGraph;

/// Pairwise shortest distances between vertices identified by external ids.
///
/// Row `i` holds the distances from `ids[i]`. An entry is `None` if either
/// identifier has no vertex or the pair is disconnected. Rows are computed in
/// parallel; the graph is read-only so no locking is needed.
pub fn distance_matrix(graph: &StreetGraph, ids: &[&str]) -> Vec<Vec<Option<f64>>> {
    let vertices: Vec<_> = ids
        .iter()
        .map(|id| graph.find_vertex_by_external_id(id))
        .collect();

    vertices
        .par_iter()
        .map(|source| {
            let Some(source) = *source else {
                return vec![None; vertices.len()];
            };
            let tree = dijkstra_tree(graph, source, None);
            vertices
                .iter()
                .map(|target| target.and_then(|t| tree.distances.get(&t).copied()))
                .collect()
        })
        .collect()
}
