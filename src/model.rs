use std::path::PathBuf;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};
use streetnet_core::prelude::*;

/// StreetGraph
///
/// Undirected street network built from a line dataset. Every distinct
/// endpoint location is one vertex; every input feature is one edge weighted
/// by its planar length (``weight_dist``). Vertices created from a feature's
/// start point carry that feature's identifier (``geoid`` by default).
///
/// Example:
///
/// .. code-block:: python
///
///     graph = convert_geojson("streets.geojson")
///     graph.save("streets.graph.gz")
///     distance, vertices = graph.shortest_path("060750101001", "060750102002")
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "StreetGraph")]
pub struct PyStreetGraph {
    pub(crate) graph: StreetGraph,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyStreetGraph {
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// One line per vertex and edge property with its kind and type
    pub fn list_properties(&self) -> String {
        self.graph.list_properties()
    }

    /// Writes the graph to ``path``; a ``.gz`` suffix enables compression
    pub fn save(&self, py: Python<'_>, path: PathBuf) -> PyResult<()> {
        py.detach(|| BinaryGraphStore::new().save(&self.graph, &path))
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Failed to save graph: {e}")))
    }

    /// Shortest path between two external identifiers
    ///
    /// Returns
    /// -------
    /// tuple[float, list[int]] | None
    ///     Distance and vertex indices along the path, or None if either
    ///     identifier is unknown or no path connects them
    pub fn shortest_path(
        &self,
        py: Python<'_>,
        start_id: &str,
        end_id: &str,
    ) -> Option<(f64, Vec<usize>)> {
        let outcome = py.detach(|| shortest_path(&self.graph, start_id, end_id));
        match outcome {
            PathOutcome::Found(path) => Some((
                path.distance,
                path.vertices.iter().map(|v| v.index()).collect(),
            )),
            PathOutcome::Unreachable => {
                log::info!("No path between {start_id} and {end_id}");
                None
            }
            PathOutcome::NotFound(which) => {
                log::warn!("No vertex for the {which} identifier ({start_id} -> {end_id})");
                None
            }
        }
    }

    /// Vertex index carrying ``external_id``, if any
    pub fn find_vertex(&self, external_id: &str) -> Option<usize> {
        self.graph
            .find_vertex_by_external_id(external_id)
            .map(|v| v.index())
    }

    /// ``"lat:lon"`` key and external identifier of a vertex
    pub fn vertex_info(&self, index: usize) -> PyResult<(String, Option<String>)> {
        let vertex = self
            .graph
            .vertex(VertexId::new(index))
            .ok_or_else(|| PyErr::new::<PyValueError, _>(format!("No vertex {index}")))?;
        Ok((vertex.location_key.clone(), vertex.external_id.clone()))
    }

    fn __repr__(&self) -> String {
        format!(
            "StreetGraph with {} vertices and {} edges",
            self.graph.vertex_count(),
            self.graph.edge_count()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

fn build_config(id_field: &str, skip_invalid: bool, legacy_indexing: bool) -> GraphBuildConfig {
    GraphBuildConfig {
        id_field: id_field.to_string(),
        skip_invalid,
        endpoint_indexing: if legacy_indexing {
            EndpointIndexing::Legacy
        } else {
            EndpointIndexing::PerEndpoint
        },
        ..GraphBuildConfig::default()
    }
}

fn build_from<S: FeatureSource>(
    py: Python<'_>,
    open: impl FnOnce() -> Result<S, Error> + Send,
    config: &GraphBuildConfig,
) -> PyResult<PyStreetGraph> {
    py.detach(|| {
        let mut source = open().map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Failed to open feature source: {e}"))
        })?;
        build_street_graph(&mut source, config)
            .map(|graph| PyStreetGraph { graph })
            .map_err(|e| {
                PyErr::new::<PyRuntimeError, _>(format!("Failed to build street graph: {e}"))
            })
    })
}

/// Build a street graph from a GeoJSON file of LineString or
/// MultiLineString features
///
/// Parameters
/// ----------
/// path : str
///     Path to a ``.geojson`` file
/// id_field : str, default="geoid"
///     Property whose value becomes the identifier of each feature's start
///     vertex
/// skip_invalid : bool, default=False
///     Skip features with unsupported geometry or mistyped attributes
///     instead of failing
/// legacy_indexing : bool, default=False
///     Leave newly created end vertices unindexed, reproducing graphs built
///     by older tools
///
/// Returns
/// -------
/// StreetGraph
///
/// Raises
/// ------
/// ValueError
///     If the file cannot be read
/// RuntimeError
///     If a feature cannot be converted
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (path, id_field = "geoid", skip_invalid = false, legacy_indexing = false))]
pub fn convert_geojson(
    py: Python<'_>,
    path: PathBuf,
    id_field: &str,
    skip_invalid: bool,
    legacy_indexing: bool,
) -> PyResult<PyStreetGraph> {
    let config = build_config(id_field, skip_invalid, legacy_indexing);
    build_from(py, || GeoJsonSource::open(&path), &config)
}

/// Build a street graph from a CSV file with a ``WKT`` geometry column
///
/// Column types are read from a ``.csvt`` file next to the CSV when present.
/// Other parameters are as for :func:`convert_geojson`.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (path, id_field = "geoid", skip_invalid = false, legacy_indexing = false))]
pub fn convert_csv(
    py: Python<'_>,
    path: PathBuf,
    id_field: &str,
    skip_invalid: bool,
    legacy_indexing: bool,
) -> PyResult<PyStreetGraph> {
    let config = build_config(id_field, skip_invalid, legacy_indexing);
    build_from(py, || CsvWktSource::open(&path), &config)
}

/// Load a graph written by :meth:`StreetGraph.save`
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn load_graph(py: Python<'_>, path: PathBuf) -> PyResult<PyStreetGraph> {
    py.detach(|| BinaryGraphStore::new().load(&path))
        .map(|graph| PyStreetGraph { graph })
        .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Failed to load graph: {e}")))
}
