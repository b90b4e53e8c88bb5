use std::collections::BTreeSet;

use crate::graph::generator::Edge;

/// Outcome of the greedy coloring diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedyColoring {
    pub colors: Vec<usize>,
    pub colors_used: usize,
}

impl GreedyColoring {
    /// Greedy found a coloring with at most three colors. A `false` here does
    /// not mean the graph is not 3-colorable.
    pub fn fits_three(&self) -> bool {
        self.colors_used <= 3
    }
}

/// Largest-first greedy coloring over nodes `0..node_count`.
///
/// Nodes are visited by descending degree, ties by ascending index; each
/// takes the smallest color not already used by a colored neighbour.
/// Diagnostic only.
pub fn greedy_largest_first(node_count: usize, edges: &[Edge]) -> GreedyColoring {
    let mut adjacency = vec![Vec::new(); node_count];
    for &(u, v) in edges {
        let (u, v) = (u as usize, v as usize);
        if u < node_count && v < node_count {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
    }

    let mut order: Vec<usize> = (0..node_count).collect();
    order.sort_by(|&a, &b| adjacency[b].len().cmp(&adjacency[a].len()).then(a.cmp(&b)));

    let mut colors: Vec<Option<usize>> = vec![None; node_count];
    for node in order {
        let taken: BTreeSet<usize> = adjacency[node].iter().filter_map(|&n| colors[n]).collect();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        colors[node] = Some(color);
    }

    let colors: Vec<usize> = colors.into_iter().map(|c| c.unwrap_or(0)).collect();
    let colors_used = colors.iter().collect::<BTreeSet<_>>().len();
    GreedyColoring { colors, colors_used }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_needs_three() {
        let result = greedy_largest_first(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(result.colors_used, 3);
        assert!(result.fits_three());
    }

    #[test]
    fn test_k4_needs_four() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let result = greedy_largest_first(4, &edges);
        assert_eq!(result.colors_used, 4);
        assert!(!result.fits_three());
    }

    #[test]
    fn test_result_is_proper() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 4)];
        let result = greedy_largest_first(5, &edges);
        for &(u, v) in &edges {
            assert_ne!(result.colors[u as usize], result.colors[v as usize]);
        }
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(greedy_largest_first(0, &[]).colors_used, 0);
        assert_eq!(greedy_largest_first(4, &[]).colors_used, 1);
    }
}
