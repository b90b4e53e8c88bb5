//! Prover-side enrollment: credential to graph, commitment, circuit and
//! inputs, in one deterministic pass.

use crate::api::auth::RegisterRequest;
use crate::circuit::{CircuitEmitter, CircuitInputs, CircuitSpec, EncodingError, ZokratesEmitter};
use crate::crypto::{hash_credential, Credential, UserHash};
use crate::graph::{commit, generate_graph, greedy_largest_first, ColoredGraph, GreedyColoring};

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub user_hash: UserHash,
    pub graph: ColoredGraph,
    pub graph_hash: String,
    pub inputs: CircuitInputs,
    pub circuit: CircuitSpec,
}

impl Enrollment {
    pub fn prepare(credential: &Credential, base_nodes: usize) -> Result<Self, EncodingError> {
        let user_hash = hash_credential(credential);
        let graph = generate_graph(&user_hash, base_nodes);
        let graph_hash = commit(graph.edges());
        let inputs = CircuitInputs::encode(&graph, credential)?;
        let circuit = CircuitSpec::for_graph(&graph);

        Ok(Enrollment {
            user_hash,
            graph,
            graph_hash,
            inputs,
            circuit,
        })
    }

    /// Program text for the external compiler.
    pub fn circuit_source(&self) -> String {
        ZokratesEmitter.emit(&self.circuit)
    }

    pub fn register_request(&self, username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            stored_hash: self.inputs.stored_hash,
            edges: Some(self.graph.edges().to_vec()),
        }
    }

    /// Diagnostic only; the generated coloring is proper by construction.
    pub fn greedy_check(&self) -> GreedyColoring {
        greedy_largest_first(self.graph.node_count(), self.graph.edges())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DEFAULT_BASE_NODES;

    #[test]
    fn test_alice_enrollment() {
        let credential = Credential::new("alice", "mypassword1234", "random_salt");
        let enrollment = Enrollment::prepare(&credential, DEFAULT_BASE_NODES).unwrap();

        assert_eq!(enrollment.graph.node_count(), 14);
        assert_eq!(enrollment.graph.edge_count(), 26);
        assert_eq!(
            enrollment.graph_hash,
            "f96a7f8f51d568ed287a75181a3c35e452ad6fe10d102fac3fd1c5671e77a00e"
        );
        assert_eq!(enrollment.inputs.len(), 72);
        assert_eq!(enrollment.circuit.check(&enrollment.inputs), Ok(()));
        assert!(enrollment.circuit_source().contains("private field[14] colors"));
        assert!(enrollment.circuit_source().contains("field[26][2] edges"));

        let request = enrollment.register_request("alice");
        assert_eq!(request.stored_hash, enrollment.inputs.stored_hash);
        assert_eq!(request.edges.as_deref(), Some(enrollment.graph.edges()));
    }

    #[test]
    fn test_bob_enrollment() {
        let credential = Credential::new("bob", "password", "salt");
        let enrollment = Enrollment::prepare(&credential, DEFAULT_BASE_NODES).unwrap();
        assert_eq!(enrollment.graph.edge_count(), 25);
        assert_eq!(
            enrollment.graph_hash,
            "a73909a32b05ceaa3dc032cbdfc4ada6aefc136e06fe9c164f1c992a2e8f8510"
        );
        assert_eq!(enrollment.inputs.len(), 70);
    }

    #[test]
    fn test_oversized_credential_rejected() {
        let credential = Credential::new("alice", "p".repeat(80), "salt");
        assert!(matches!(
            Enrollment::prepare(&credential, DEFAULT_BASE_NODES),
            Err(EncodingError::PreimageTooLong { .. })
        ));
    }
}
