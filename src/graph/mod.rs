pub mod coloring;
pub mod commitment;
pub mod generator;

pub use coloring::{greedy_largest_first, GreedyColoring};
pub use commitment::{canonical_edge_string, commit};
pub use generator::{generate_graph, node_count, ColoredGraph, Edge, DEFAULT_BASE_NODES};
