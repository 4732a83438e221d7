//! Shortest path queries over a built street graph

pub(crate) mod dijkstra;
pub mod matrix;
pub mod query;
mod to_geojson;

pub use matrix::distance_matrix;
pub use query::{PathOutcome, ShortestPath, shortest_path, shortest_path_between};
