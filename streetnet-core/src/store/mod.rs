//! Persistence of built street graphs

mod binary;

use std::path::Path;

use crate::Error;
use crate::model::StreetGraph;

pub use binary::{BinaryGraphStore, FORMAT_VERSION, MAGIC};

/// Serializes and deserializes street graphs
pub trait GraphStore {
    /// Writes `graph` to `path`, replacing an existing file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    fn save(&self, graph: &StreetGraph, path: &Path) -> Result<(), Error>;

    /// Reads a graph written by [`GraphStore::save`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a graph file
    fn load(&self, path: &Path) -> Result<StreetGraph, Error>;
}
