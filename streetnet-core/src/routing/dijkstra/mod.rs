mod state;
pub mod traced_dijkstra;

pub(crate) use traced_dijkstra::dijkstra_tree;
