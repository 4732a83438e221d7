use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;

use crate::model::PyStreetGraph;

/// Pairwise shortest distances between external identifiers
///
/// Row ``i`` holds the distances from ``ids[i]``; unknown identifiers and
/// disconnected pairs are None. Rows are computed in parallel.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn distance_matrix(
    py: Python<'_>,
    graph: &PyStreetGraph,
    ids: Vec<String>,
) -> Vec<Vec<Option<f64>>> {
    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    py.detach(|| streetnet_core::prelude::distance_matrix(&graph.graph, &ids))
}
