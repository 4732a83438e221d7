use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use matrix::distance_matrix;
use model::{PyStreetGraph, convert_csv, convert_geojson, load_graph};
use routing::{find_route, route_geojson};

pub mod matrix;
pub mod model;
pub mod routing;

/// Street network graphs from line datasets
#[pymodule]
fn streetnet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyStreetGraph>()?;
    m.add_function(wrap_pyfunction!(convert_geojson, m)?)?;
    m.add_function(wrap_pyfunction!(convert_csv, m)?)?;
    m.add_function(wrap_pyfunction!(load_graph, m)?)?;

    m.add_function(wrap_pyfunction!(find_route, m)?)?;
    m.add_function(wrap_pyfunction!(route_geojson, m)?)?;

    m.add_function(wrap_pyfunction!(distance_matrix, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
