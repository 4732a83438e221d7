use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use streetnet_core::prelude::*;

use crate::model::PyStreetGraph;

/// Detailed shortest path between two external identifiers
///
/// Returns
/// -------
/// dict
///     ``status`` is ``"found"``, ``"unreachable"`` or ``"not_found"``.
///     Found paths add ``distance``, ``vertices`` (vertex indices) and
///     ``edges`` (edge indices); ``not_found`` adds ``missing`` naming the
///     unknown side.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn find_route<'py>(
    py: Python<'py>,
    graph: &PyStreetGraph,
    start_id: &str,
    end_id: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let outcome = py.detach(|| shortest_path(&graph.graph, start_id, end_id));

    let result = PyDict::new(py);
    match outcome {
        PathOutcome::Found(path) => {
            result.set_item("status", "found")?;
            result.set_item("distance", path.distance)?;
            result.set_item(
                "vertices",
                path.vertices.iter().map(|v| v.index()).collect::<Vec<_>>(),
            )?;
            result.set_item(
                "edges",
                path.edges.iter().map(|e| e.index()).collect::<Vec<_>>(),
            )?;
        }
        PathOutcome::Unreachable => result.set_item("status", "unreachable")?,
        PathOutcome::NotFound(which) => {
            result.set_item("status", "not_found")?;
            result.set_item("missing", which.to_string())?;
        }
    }
    Ok(result)
}

/// Shortest path as a GeoJSON ``FeatureCollection`` string, one feature per
/// traversed edge, or None if there is no path
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn route_geojson(
    py: Python<'_>,
    graph: &PyStreetGraph,
    start_id: &str,
    end_id: &str,
) -> PyResult<Option<String>> {
    py.detach(|| match shortest_path(&graph.graph, start_id, end_id) {
        PathOutcome::Found(path) => path.to_geojson_string(&graph.graph).map(Some),
        _ => Ok(None),
    })
    .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Failed to export route: {e}")))
}
