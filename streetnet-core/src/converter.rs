//! Stateful load / save / query workflow over a single graph

use std::path::Path;

use log::info;

use crate::Error;
use crate::loading::{
    BuildReport, FeatureSource, GraphBuildConfig, build_street_graph_with_report,
    open_feature_source,
};
use crate::model::StreetGraph;
use crate::routing::{PathOutcome, shortest_path};
use crate::store::{BinaryGraphStore, GraphStore};

/// Converts a line dataset into a street graph, persists it and answers path
/// queries on it.
///
/// Saving or querying before a graph was built or loaded fails with
/// [`Error::MissingGraph`].
#[derive(Debug)]
pub struct StreetNetworkConverter<S: GraphStore = BinaryGraphStore> {
    config: GraphBuildConfig,
    store: S,
    graph: Option<StreetGraph>,
    report: Option<BuildReport>,
}

impl StreetNetworkConverter<BinaryGraphStore> {
    pub fn new(config: GraphBuildConfig) -> Self {
        Self::with_store(config, BinaryGraphStore::new())
    }
}

impl Default for StreetNetworkConverter<BinaryGraphStore> {
    fn default() -> Self {
        Self::new(GraphBuildConfig::default())
    }
}

impl<S: GraphStore> StreetNetworkConverter<S> {
    pub fn with_store(config: GraphBuildConfig, store: S) -> Self {
        Self {
            config,
            store,
            graph: None,
            report: None,
        }
    }

    /// Builds the graph from a vector file, replacing any loaded graph
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the build fails; the
    /// previous graph is dropped either way
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&BuildReport, Error> {
        let path = path.as_ref();
        info!("Loading street features from {}", path.display());
        self.clear();
        let mut source = open_feature_source(path)?;
        self.load_source(source.as_mut())
    }

    /// Builds the graph from any feature source, replacing any loaded graph
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails; the previous graph is dropped
    pub fn load_source(&mut self, source: &mut dyn FeatureSource) -> Result<&BuildReport, Error> {
        self.clear();

        let (graph, report) = build_street_graph_with_report(source, &self.config)?;
        self.graph = Some(graph);
        Ok(self.report.insert(report))
    }

    /// Loads a previously saved graph
    ///
    /// # Errors
    ///
    /// Returns an error if the graph file cannot be read; the previous graph
    /// is dropped either way
    pub fn load_graph(&mut self, path: impl AsRef<Path>) -> Result<&StreetGraph, Error> {
        self.clear();
        let graph = self.store.load(path.as_ref())?;
        Ok(self.graph.insert(graph))
    }

    /// Writes the current graph to `path`
    ///
    /// # Errors
    ///
    /// `MissingGraph` if nothing was loaded, otherwise store errors
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.store.save(self.graph()?, path.as_ref())
    }

    /// Shortest path between two external identifiers
    ///
    /// # Errors
    ///
    /// `MissingGraph` if nothing was loaded. Unknown identifiers and
    /// unreachable targets are reported through [`PathOutcome`].
    pub fn shortest_path(&self, start_id: &str, end_id: &str) -> Result<PathOutcome, Error> {
        Ok(shortest_path(self.graph()?, start_id, end_id))
    }

    /// Diagnostic listing of the graph's properties
    ///
    /// # Errors
    ///
    /// `MissingGraph` if nothing was loaded
    pub fn list_properties(&self) -> Result<String, Error> {
        Ok(self.graph()?.list_properties())
    }

    /// # Errors
    ///
    /// `MissingGraph` if nothing was loaded
    pub fn graph(&self) -> Result<&StreetGraph, Error> {
        self.graph.as_ref().ok_or(Error::MissingGraph)
    }

    pub fn into_graph(self) -> Option<StreetGraph> {
        self.graph
    }

    /// Counters of the last build; `None` after loading a saved graph
    pub fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    pub fn config(&self) -> &GraphBuildConfig {
        &self.config
    }

    fn clear(&mut self) {
        self.graph = None;
        self.report = None;
    }
}
