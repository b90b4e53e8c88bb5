use crate::crypto::{GraphRng, UserHash};

/// Default `N_base`.
pub const DEFAULT_BASE_NODES: usize = 10;

/// Edge probability between two differently colored nodes.
pub const EDGE_PROBABILITY: f64 = 0.4;

/// An undirected edge, always stored with `u < v`.
pub type Edge = (u32, u32);

/// A graph on nodes `0..N` together with the proper 3-coloring it was
/// built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredGraph {
    colors: Vec<u8>,
    edges: Vec<Edge>,
}

impl ColoredGraph {
    pub fn node_count(&self) -> usize {
        self.colors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Colors indexed by node.
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    /// Edges in generation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn color(&self, node: u32) -> Option<u8> {
        self.colors.get(node as usize).copied()
    }

    /// Whether every edge joins two differently colored nodes.
    pub fn is_properly_colored(&self) -> bool {
        self.edges
            .iter()
            .all(|&(u, v)| self.color(u) != self.color(v))
    }
}

/// Node count for a digest.
///
/// `N_base + (hex length of the digest mod 10)`. A SHA-256 hex digest is
/// always 64 characters, so the offset is the constant 4.
pub fn node_count(user_hash: &UserHash, base_nodes: usize) -> usize {
    base_nodes + user_hash.to_hex().len() % 10
}

/// Derive the colored graph for a credential digest.
///
/// Draw order is part of the output: one color draw per node, then one unit
/// draw per pair `(i, j)`, `i < j`, in row-major order, whether or not the
/// edge is kept.
pub fn generate_graph(user_hash: &UserHash, base_nodes: usize) -> ColoredGraph {
    let mut rng = GraphRng::from_seed(user_hash.seed());
    let n = node_count(user_hash, base_nodes);

    let colors: Vec<u8> = (0..n).map(|_| rng.next_color()).collect();

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let draw = rng.next_unit();
            if colors[i] != colors[j] && draw < EDGE_PROBABILITY {
                edges.push((i as u32, j as u32));
            }
        }
    }

    tracing::trace!(nodes = n, edges = edges.len(), "graph generated");
    ColoredGraph { colors, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash_credential, Credential};

    fn alice() -> UserHash {
        hash_credential(&Credential::new("alice", "mypassword1234", "random_salt"))
    }

    #[test]
    fn test_node_count_offset_is_constant() {
        assert_eq!(node_count(&alice(), DEFAULT_BASE_NODES), 14);
        assert_eq!(node_count(&alice(), 3), 7);
    }

    #[test]
    fn test_pinned_alice_graph() {
        let graph = generate_graph(&alice(), DEFAULT_BASE_NODES);
        assert_eq!(graph.node_count(), 14);
        assert_eq!(graph.colors(), &[1, 2, 0, 2, 0, 2, 1, 1, 0, 0, 2, 1, 2, 0]);
        assert_eq!(
            graph.edges(),
            &[
                (0, 1), (0, 2), (0, 5), (0, 10), (0, 13), (1, 4), (1, 8), (1, 9), (1, 11),
                (2, 3), (2, 10), (2, 11), (2, 12), (3, 4), (3, 6), (4, 5), (4, 6), (4, 7),
                (5, 8), (5, 9), (6, 9), (6, 12), (6, 13), (7, 9), (7, 13), (8, 12),
            ]
        );
    }

    #[test]
    fn test_edges_ordered_and_proper() {
        let graph = generate_graph(&alice(), 25);
        assert!(graph.is_properly_colored());
        assert!(graph.edges().iter().all(|&(u, v)| u < v));
        assert!(graph.edges().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_base_nodes() {
        let graph = generate_graph(&alice(), 0);
        assert_eq!(graph.node_count(), 4);
        assert!(graph.is_properly_colored());
    }
}
