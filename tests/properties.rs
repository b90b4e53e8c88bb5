use proptest::prelude::*;

use zk_graph_auth::circuit::{expected_len, CircuitInputs, CircuitSpec};
use zk_graph_auth::client::Enrollment;
use zk_graph_auth::crypto::{hash_credential, Credential};
use zk_graph_auth::graph::{commit, generate_graph, Edge};

// Keeps `username:password:salt` within the 64-byte circuit preimage.
fn credential() -> impl Strategy<Value = Credential> {
    ("[a-z0-9_]{1,16}", "[ -~]{0,20}", "[a-zA-Z0-9]{0,20}")
        .prop_map(|(u, p, s)| Credential::new(u, p, s))
}

fn edge_set() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::btree_set((0u32..40, 0u32..40), 0..30).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(u, v)| u != v)
            .map(|(u, v)| (u.min(v), u.max(v)))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    })
}

proptest! {
    /// The whole pipeline replays bit-for-bit.
    #[test]
    fn pipeline_is_deterministic(cred in credential(), base in 0usize..20) {
        let a = Enrollment::prepare(&cred, base).unwrap();
        let b = Enrollment::prepare(&cred, base).unwrap();
        prop_assert_eq!(a.user_hash, b.user_hash);
        prop_assert_eq!(a.graph, b.graph);
        prop_assert_eq!(a.graph_hash, b.graph_hash);
        prop_assert_eq!(a.inputs, b.inputs);
    }

    /// Every generated edge joins two differently colored nodes.
    #[test]
    fn generated_graphs_are_properly_colored(cred in credential(), base in 0usize..30) {
        let graph = generate_graph(&hash_credential(&cred), base);
        for &(u, v) in graph.edges() {
            prop_assert!(u < v);
            prop_assert_ne!(graph.colors()[u as usize], graph.colors()[v as usize]);
            prop_assert!(graph.colors()[u as usize] <= 2);
        }
    }

    /// Sort-then-hash makes the commitment independent of edge order.
    #[test]
    fn commitment_ignores_edge_order(
        (edges, shuffled) in edge_set().prop_flat_map(|e| (Just(e.clone()), Just(e).prop_shuffle()))
    ) {
        prop_assert_eq!(commit(&edges), commit(&shuffled));
    }

    /// `len == N + 2M + 6`, and honest inputs satisfy the circuit.
    #[test]
    fn encoder_length_law(cred in credential(), base in 0usize..25) {
        let graph = generate_graph(&hash_credential(&cred), base);
        let inputs = CircuitInputs::encode(&graph, &cred).unwrap();
        let expected = graph.node_count() + 2 * graph.edge_count() + 6;
        prop_assert_eq!(inputs.len(), expected);
        prop_assert_eq!(inputs.to_field_elements().len(), expected);
        prop_assert_eq!(expected_len(graph.node_count(), graph.edge_count()), expected);
        prop_assert_eq!(CircuitSpec::for_graph(&graph).check(&inputs), Ok(()));
    }

    /// Any change to a credential field changes the digest.
    #[test]
    fn digest_is_sensitive_to_each_field(cred in credential(), extra in "[a-z]{1,3}") {
        let base = hash_credential(&cred);
        let changed = [
            Credential::new(format!("{}{}", cred.username, extra), &cred.password, &cred.salt),
            Credential::new(&cred.username, format!("{}{}", cred.password, extra), &cred.salt),
            Credential::new(&cred.username, &cred.password, format!("{}{}", cred.salt, extra)),
        ];
        for other in &changed {
            prop_assert_ne!(base, hash_credential(other));
        }
    }
}
