use thiserror::Error;

use crate::circuit::field::FieldElement;
use crate::circuit::inputs::{hash_packed, CircuitInputs, HASH_INPUT_LEN, STORED_HASH_LEN};
use crate::graph::{ColoredGraph, Edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
}

/// A `field` array parameter of the circuit's entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub visibility: Visibility,
    /// Array dimensions, outermost first: `[M, 2]` is `field[M][2]`.
    pub dims: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `c * (c - 1) * (c - 2) == 0` for `colors[node]`.
    ColorDomain { node: usize },
    /// `colors[u] != colors[v]`.
    EdgeDistinct { u: u32, v: u32 },
    /// Packed SHA-256 of `hash_input` equals `stored_hash`.
    HashBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("circuit expects {expected_nodes} colors and {expected_edges} edges, got {nodes} and {edges}")]
    Arity {
        expected_nodes: usize,
        expected_edges: usize,
        nodes: usize,
        edges: usize,
    },
    #[error("color of node {node} is {value}, outside {{0, 1, 2}}")]
    ColorDomain { node: usize, value: FieldElement },
    #[error("edge ({u}, {v}) joins two nodes of the same color")]
    EdgeDistinct { u: u32, v: u32 },
    #[error("edge endpoint {index} does not exist")]
    EdgeOutOfRange { index: u32 },
    #[error("hash_input does not hash to stored_hash")]
    HashBinding,
}

/// Per-instance circuit description: parameters sized to `(N, M)` plus
/// N color-domain, M edge and one hash constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitSpec {
    nodes: usize,
    edges: Vec<Edge>,
    params: Vec<Param>,
    constraints: Vec<Constraint>,
}

impl CircuitSpec {
    pub fn build(nodes: usize, edges: &[Edge]) -> Self {
        let mut params = vec![Param {
            name: "colors",
            visibility: Visibility::Private,
            dims: vec![nodes],
        }];
        // zero-length arrays are not valid circuit parameters
        if !edges.is_empty() {
            params.push(Param {
                name: "edges",
                visibility: Visibility::Public,
                dims: vec![edges.len(), 2],
            });
        }
        params.push(Param {
            name: "hash_input",
            visibility: Visibility::Private,
            dims: vec![HASH_INPUT_LEN],
        });
        params.push(Param {
            name: "stored_hash",
            visibility: Visibility::Public,
            dims: vec![STORED_HASH_LEN],
        });

        let mut constraints = Vec::with_capacity(nodes + edges.len() + 1);
        constraints.extend((0..nodes).map(|node| Constraint::ColorDomain { node }));
        constraints.extend(edges.iter().map(|&(u, v)| Constraint::EdgeDistinct { u, v }));
        constraints.push(Constraint::HashBinding);

        CircuitSpec {
            nodes,
            edges: edges.to_vec(),
            params,
            constraints,
        }
    }

    pub fn for_graph(graph: &ColoredGraph) -> Self {
        Self::build(graph.node_count(), graph.edges())
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Evaluate every constraint natively against `inputs` and return the
    /// first one that fails.
    pub fn check(&self, inputs: &CircuitInputs) -> Result<(), Violation> {
        if inputs.colors.len() != self.nodes || inputs.edges.len() != self.edges.len() {
            return Err(Violation::Arity {
                expected_nodes: self.nodes,
                expected_edges: self.edges.len(),
                nodes: inputs.colors.len(),
                edges: inputs.edges.len(),
            });
        }

        for constraint in &self.constraints {
            match *constraint {
                Constraint::ColorDomain { node } => {
                    let value = inputs.colors[node];
                    if value.value() > 2 {
                        return Err(Violation::ColorDomain { node, value });
                    }
                }
                Constraint::EdgeDistinct { u, v } => {
                    let cu = color_at(inputs, u)?;
                    let cv = color_at(inputs, v)?;
                    if cu == cv {
                        return Err(Violation::EdgeDistinct { u, v });
                    }
                }
                Constraint::HashBinding => {
                    if hash_packed(&inputs.hash_input) != inputs.stored_hash {
                        return Err(Violation::HashBinding);
                    }
                }
            }
        }
        Ok(())
    }
}

fn color_at(inputs: &CircuitInputs, index: u32) -> Result<FieldElement, Violation> {
    inputs
        .colors
        .get(index as usize)
        .copied()
        .ok_or(Violation::EdgeOutOfRange { index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash_credential, Credential};
    use crate::graph::{generate_graph, DEFAULT_BASE_NODES};

    fn alice_inputs() -> (CircuitSpec, CircuitInputs) {
        let credential = Credential::new("alice", "mypassword1234", "random_salt");
        let graph = generate_graph(&hash_credential(&credential), DEFAULT_BASE_NODES);
        let inputs = CircuitInputs::encode(&graph, &credential).unwrap();
        (CircuitSpec::for_graph(&graph), inputs)
    }

    #[test]
    fn test_constraint_counts() {
        let spec = CircuitSpec::build(5, &[(0, 1), (1, 2)]);
        let constraints = spec.constraints();
        assert_eq!(constraints.len(), 5 + 2 + 1);
        assert_eq!(
            constraints
                .iter()
                .filter(|c| matches!(c, Constraint::HashBinding))
                .count(),
            1
        );
        assert_eq!(spec.params()[1].dims, vec![2, 2]);
    }

    #[test]
    fn test_edgeless_graph_drops_edge_param() {
        let spec = CircuitSpec::build(3, &[]);
        let names: Vec<&str> = spec.params().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["colors", "hash_input", "stored_hash"]);
        assert_eq!(spec.constraints().len(), 4);
    }

    #[test]
    fn test_honest_inputs_satisfy() {
        let (spec, inputs) = alice_inputs();
        assert_eq!(spec.check(&inputs), Ok(()));
    }

    #[test]
    fn test_bad_color_rejected() {
        let (spec, mut inputs) = alice_inputs();
        inputs.colors[3] = FieldElement(3);
        assert_eq!(
            spec.check(&inputs),
            Err(Violation::ColorDomain {
                node: 3,
                value: FieldElement(3)
            })
        );
    }

    #[test]
    fn test_same_color_edge_rejected() {
        let (spec, mut inputs) = alice_inputs();
        // edge (0, 1): give node 1 the color of node 0
        inputs.colors[1] = inputs.colors[0];
        assert_eq!(spec.check(&inputs), Err(Violation::EdgeDistinct { u: 0, v: 1 }));
    }

    #[test]
    fn test_tampered_hash_rejected() {
        let (spec, mut inputs) = alice_inputs();
        inputs.stored_hash[1] = FieldElement(inputs.stored_hash[1].value() ^ 1);
        assert_eq!(spec.check(&inputs), Err(Violation::HashBinding));
    }

    #[test]
    fn test_arity_mismatch() {
        let (_, inputs) = alice_inputs();
        let other = CircuitSpec::build(4, &[]);
        assert!(matches!(other.check(&inputs), Err(Violation::Arity { .. })));
    }
}
