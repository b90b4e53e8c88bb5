use crate::crypto::sha256_hex;
use crate::graph::generator::Edge;

/// Canonical string form of an edge set: each edge as `u-v`, sorted as
/// strings (so `10-2` precedes `2-3`), joined with no separator.
pub fn canonical_edge_string(edges: &[Edge]) -> String {
    let mut rendered: Vec<String> = edges.iter().map(|(u, v)| format!("{u}-{v}")).collect();
    rendered.sort_unstable();
    rendered.concat()
}

/// Public commitment to a graph: SHA-256 hex of [`canonical_edge_string`].
pub fn commit(edges: &[Edge]) -> String {
    sha256_hex(canonical_edge_string(edges).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_not_numeric() {
        assert_eq!(canonical_edge_string(&[(2, 3), (10, 2)]), "10-22-3");
        assert_eq!(canonical_edge_string(&[(1, 2), (0, 12)]), "0-121-2");
    }

    #[test]
    fn test_empty_edge_set() {
        assert_eq!(
            commit(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_order_independent() {
        let a = commit(&[(0, 1), (2, 3)]);
        let b = commit(&[(2, 3), (0, 1)]);
        assert_eq!(a, b);
        assert_eq!(
            a,
            "af47fb0e13b4782e0eddfb8efdb1ca4119b6b44df4e01efe25c36db3120e245f"
        );
    }
}
