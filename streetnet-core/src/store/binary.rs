//! Binary graph file format
//!
//! ```text
//! [8 bytes: magic "STNGRAPH"] [4 bytes: format version, LE] [bincode payload]
//! ```
//!
//! The payload holds the schema, the endpoint indexing mode, all vertices in
//! index order and all edges as `(start, end, edge)`. Files whose name ends
//! in `.gz` are gzip-compressed as a whole.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::{debug, info};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::GraphStore;
use crate::Error;
use crate::model::{EndpointIndexing, GraphSchema, StreetEdge, StreetGraph, StreetVertex};

pub const MAGIC: &[u8; 8] = b"STNGRAPH";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema: &'a GraphSchema,
    indexing: EndpointIndexing,
    vertices: Vec<&'a StreetVertex>,
    edges: Vec<(u32, u32, &'a StreetEdge)>,
}

#[derive(Deserialize)]
struct Snapshot {
    schema: GraphSchema,
    indexing: EndpointIndexing,
    vertices: Vec<StreetVertex>,
    edges: Vec<(u32, u32, StreetEdge)>,
}

/// Stores graphs in the `STNGRAPH` binary format
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryGraphStore;

impl BinaryGraphStore {
    pub fn new() -> Self {
        Self
    }

    /// Encodes a graph into any writer
    ///
    /// # Errors
    ///
    /// Returns an error if writing or encoding fails
    pub fn write_to<W: Write>(&self, graph: &StreetGraph, mut writer: W) -> Result<(), Error> {
        let inner = &graph.graph;
        let snapshot = SnapshotRef {
            schema: &graph.schema,
            indexing: graph.indexing,
            vertices: inner.node_weights().collect(),
            edges: inner
                .edge_references()
                .map(|e| (index_u32(e.source()), index_u32(e.target()), e.weight()))
                .collect(),
        };

        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
        Ok(())
    }

    /// Decodes a graph from any reader
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` for a wrong magic, an unknown version or edges
    /// pointing outside the vertex list
    pub fn read_from<R: Read>(&self, mut reader: R) -> Result<StreetGraph, Error> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::InvalidData("not a street graph file".to_string()));
        }

        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported graph format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        let snapshot: Snapshot = bincode::deserialize_from(reader)?;
        debug!(
            "Decoded graph snapshot: {} vertices, {} edges",
            snapshot.vertices.len(),
            snapshot.edges.len()
        );

        let mut graph: UnGraph<StreetVertex, StreetEdge> =
            UnGraph::with_capacity(snapshot.vertices.len(), snapshot.edges.len());
        for vertex in snapshot.vertices {
            graph.add_node(vertex);
        }

        let vertex_count = graph.node_count();
        for (start, end, edge) in snapshot.edges {
            let (start, end) = (start as usize, end as usize);
            if start >= vertex_count || end >= vertex_count {
                return Err(Error::InvalidData(format!(
                    "edge ({start}, {end}) references a vertex outside 0..{vertex_count}"
                )));
            }
            graph.add_edge(NodeIndex::new(start), NodeIndex::new(end), edge);
        }

        Ok(StreetGraph::from_parts(
            graph,
            snapshot.schema,
            snapshot.indexing,
        ))
    }
}

impl GraphStore for BinaryGraphStore {
    fn save(&self, graph: &StreetGraph, path: &Path) -> Result<(), Error> {
        let writer = BufWriter::new(File::create(path)?);
        if is_gzip(path) {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            self.write_to(graph, &mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            self.write_to(graph, writer)?;
        }

        info!(
            "Saved graph with {} vertices and {} edges to {}",
            graph.vertex_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<StreetGraph, Error> {
        let reader = BufReader::new(File::open(path)?);
        let graph = if is_gzip(path) {
            self.read_from(GzDecoder::new(reader))?
        } else {
            self.read_from(reader)?
        };

        info!(
            "Loaded graph with {} vertices and {} edges from {}",
            graph.vertex_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(graph)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

#[allow(clippy::cast_possible_truncation)]
fn index_u32(node: NodeIndex) -> u32 {
    // petgraph's default index type is u32, so indices always fit
    node.index() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_magic() {
        let store = BinaryGraphStore::new();
        let err = store.read_from(&b"NOTAGRAPH\x01\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&99u32.to_le_bytes());

        let err = BinaryGraphStore::new().read_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(ref msg) if msg.contains("99")));
    }

    #[test]
    fn test_truncated_file_is_error() {
        let err = BinaryGraphStore::new().read_from(&MAGIC[..4]).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_gzip_extension() {
        assert!(is_gzip(Path::new("streets.graph.gz")));
        assert!(!is_gzip(Path::new("streets.graph")));
    }
}
