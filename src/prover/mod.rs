//! Interface to the external proving engine.
//!
//! Witness computation, proof generation and proof verification happen in
//! an external backend. This module fixes the calls the rest of the crate
//! makes and how their outcomes are classified; [`ZokratesCli`] drives the
//! `zokrates` command-line tool.

pub mod zokrates;

pub use zokrates::ZokratesCli;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::circuit::{CircuitInputs, FieldElement};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} timed out after {after:?}")]
    Timeout { step: &'static str, after: Duration },

    #[error("{step} exited with {status}: {stderr}")]
    Exited {
        step: &'static str,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("proof is not valid JSON: {0}")]
    ProofFormat(#[from] serde_json::Error),
}

/// Backend-specific witness bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness(pub Vec<u8>);

/// A proof as produced by the backend. Never inspected by the server beyond
/// handing it back to the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(pub serde_json::Value);

/// Classified verifier result. Only [`VerifyOutcome::Passed`] is success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Passed,
    Failed,
    Malformed(String),
}

impl VerifyOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, VerifyOutcome::Passed)
    }
}

#[async_trait]
pub trait ProvingEngine: Send + Sync {
    /// Evaluate the compiled `program` on `inputs`.
    async fn compute_witness(
        &self,
        program: &Path,
        inputs: &CircuitInputs,
    ) -> Result<Witness, EngineError>;

    async fn generate_proof(
        &self,
        program: &Path,
        proving_key: &Path,
        witness: &Witness,
    ) -> Result<Proof, EngineError>;

    async fn verify(
        &self,
        proof: &Proof,
        inputs: &[FieldElement],
        verification_key: &Path,
    ) -> Result<VerifyOutcome, EngineError>;
}
