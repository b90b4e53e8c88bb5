//! Packs a witness and its commitment into the flat input vector the
//! circuit consumes.
//!
//! Layout: `colors (N) ++ edges (2M) ++ hash_input (4) ++ stored_hash (2)`.
//! `hash_input` is the credential preimage zero-padded to 64 bytes and read
//! as four big-endian 128-bit chunks; `stored_hash` is SHA-256 of those same
//! 64 bytes read as two big-endian halves. The circuit rehashes
//! `hash_input` and asserts equality with `stored_hash`, so this byte layout
//! must not drift.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::circuit::field::{FieldElement, FieldParseError};
use crate::crypto::Credential;
use crate::graph::ColoredGraph;

pub const PREIMAGE_BYTES: usize = 64;
pub const HASH_INPUT_LEN: usize = 4;
pub const STORED_HASH_LEN: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("credential preimage is {len} bytes, at most 64 fit the circuit")]
    PreimageTooLong { len: usize },

    #[error("input file has {found} values, expected {expected}")]
    TokenCount { expected: usize, found: usize },

    #[error("input value #{position}: {source}")]
    InvalidToken {
        position: usize,
        #[source]
        source: FieldParseError,
    },
}

/// Zero-pad the credential preimage to exactly 64 bytes.
pub fn pad_preimage(credential: &Credential) -> Result<[u8; PREIMAGE_BYTES], EncodingError> {
    let preimage = credential.preimage();
    let bytes = preimage.as_bytes();
    if bytes.len() > PREIMAGE_BYTES {
        return Err(EncodingError::PreimageTooLong { len: bytes.len() });
    }
    let mut padded = [0u8; PREIMAGE_BYTES];
    padded[..bytes.len()].copy_from_slice(bytes);
    Ok(padded)
}

/// Four big-endian 128-bit chunks of a padded preimage.
pub fn pack_hash_input(padded: &[u8; PREIMAGE_BYTES]) -> [FieldElement; HASH_INPUT_LEN] {
    let mut out = [FieldElement::ZERO; HASH_INPUT_LEN];
    for (slot, chunk) in out.iter_mut().zip(padded.chunks_exact(16)) {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(chunk);
        *slot = FieldElement::from_be_chunk(&buf);
    }
    out
}

/// SHA-256 over the 64 bytes packed in `hash_input`, split into two
/// big-endian halves. Same result as the circuit's packed SHA-256 gadget.
pub fn hash_packed(hash_input: &[FieldElement; HASH_INPUT_LEN]) -> [FieldElement; STORED_HASH_LEN] {
    let mut hasher = Sha256::new();
    for element in hash_input {
        hasher.update(element.to_be_chunk());
    }
    let digest = hasher.finalize();

    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&digest[..16]);
    lo.copy_from_slice(&digest[16..]);
    [FieldElement::from_be_chunk(&hi), FieldElement::from_be_chunk(&lo)]
}

/// The commitment a user registers: packed SHA-256 of the padded preimage.
pub fn stored_hash_for(credential: &Credential) -> Result<[FieldElement; STORED_HASH_LEN], EncodingError> {
    let padded = pad_preimage(credential)?;
    let digest = Sha256::digest(padded);

    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&digest[..16]);
    lo.copy_from_slice(&digest[16..]);
    Ok([FieldElement::from_be_chunk(&hi), FieldElement::from_be_chunk(&lo)])
}

/// Structured view of the circuit input vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitInputs {
    pub colors: Vec<FieldElement>,
    pub edges: Vec<[FieldElement; 2]>,
    pub hash_input: [FieldElement; HASH_INPUT_LEN],
    pub stored_hash: [FieldElement; STORED_HASH_LEN],
}

impl CircuitInputs {
    /// Encode a generated graph and its credential.
    pub fn encode(graph: &ColoredGraph, credential: &Credential) -> Result<Self, EncodingError> {
        let padded = pad_preimage(credential)?;
        let hash_input = pack_hash_input(&padded);
        let stored_hash = stored_hash_for(credential)?;

        Ok(CircuitInputs {
            colors: graph.colors().iter().map(|&c| FieldElement::from(c)).collect(),
            edges: graph
                .edges()
                .iter()
                .map(|&(u, v)| [FieldElement::from(u), FieldElement::from(v)])
                .collect(),
            hash_input,
            stored_hash,
        })
    }

    /// `N + 2M + 6`.
    pub fn len(&self) -> usize {
        expected_len(self.colors.len(), self.edges.len())
    }

    /// Flat vector in circuit order.
    pub fn to_field_elements(&self) -> Vec<FieldElement> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.colors);
        out.extend(self.edges.iter().flatten().copied());
        out.extend_from_slice(&self.hash_input);
        out.extend_from_slice(&self.stored_hash);
        out
    }

    /// Decimal strings in circuit order, the shape sent in a login request.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.to_field_elements().iter().map(|e| e.to_string()).collect()
    }

    /// Whitespace-separated input file, one line.
    pub fn to_input_file(&self) -> String {
        let mut line = self.to_decimal_strings().join(" ");
        line.push('\n');
        line
    }

    /// Split a flat vector back into its sections for a graph of `nodes`
    /// nodes and `edges` edges.
    pub fn from_field_elements(
        values: &[FieldElement],
        nodes: usize,
        edges: usize,
    ) -> Result<Self, EncodingError> {
        let expected = expected_len(nodes, edges);
        if values.len() != expected {
            return Err(EncodingError::TokenCount {
                expected,
                found: values.len(),
            });
        }

        let (colors, rest) = values.split_at(nodes);
        let (edge_values, rest) = rest.split_at(2 * edges);
        let (hash_values, stored_values) = rest.split_at(HASH_INPUT_LEN);

        let mut hash_input = [FieldElement::ZERO; HASH_INPUT_LEN];
        hash_input.copy_from_slice(hash_values);
        let mut stored_hash = [FieldElement::ZERO; STORED_HASH_LEN];
        stored_hash.copy_from_slice(stored_values);

        Ok(CircuitInputs {
            colors: colors.to_vec(),
            edges: edge_values.chunks_exact(2).map(|p| [p[0], p[1]]).collect(),
            hash_input,
            stored_hash,
        })
    }

    /// Parse an input file produced by [`CircuitInputs::to_input_file`].
    pub fn parse(text: &str, nodes: usize, edges: usize) -> Result<Self, EncodingError> {
        let values = text
            .split_whitespace()
            .enumerate()
            .map(|(position, token)| {
                token
                    .parse::<FieldElement>()
                    .map_err(|source| EncodingError::InvalidToken { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_field_elements(&values, nodes, edges)
    }
}

pub fn expected_len(nodes: usize, edges: usize) -> usize {
    nodes + 2 * edges + HASH_INPUT_LEN + STORED_HASH_LEN
}
