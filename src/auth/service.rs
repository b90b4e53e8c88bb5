use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::inputs::flatten_inputs;
use crate::auth::locks::UserLocks;
use crate::circuit::FieldElement;
use crate::db::{UserRecord, UserStore};
use crate::error::AppError;
use crate::graph::Edge;
use crate::prover::{Proof, ProvingEngine, VerifyOutcome};

pub const MAX_USERNAME_BYTES: usize = 64;

/// Registration payload after boundary parsing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub stored_hash: [FieldElement; 2],
    pub edges: Option<Vec<Edge>>,
}

/// Commitment-check-then-relay authentication.
///
/// The service never sees a coloring or credential. Login compares the
/// submitted stored-hash suffix with the registered one and only then asks
/// the proving engine to verify the proof.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    engine: Arc<dyn ProvingEngine>,
    verification_key: PathBuf,
    verify_timeout: Duration,
    locks: UserLocks,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        engine: Arc<dyn ProvingEngine>,
        verification_key: impl Into<PathBuf>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            store,
            engine,
            verification_key: verification_key.into(),
            verify_timeout,
            locks: UserLocks::new(),
        }
    }

    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    /// Store (or replace) the commitment for a username.
    pub async fn register(&self, registration: Registration) -> Result<UserRecord, AppError> {
        validate_username(&registration.username)?;
        if let Some(edges) = &registration.edges {
            validate_edges(edges)?;
        }

        let record = UserRecord {
            username: registration.username,
            stored_hash: registration.stored_hash,
            edges: registration.edges,
            updated_at: chrono::Utc::now().timestamp(),
        };

        let _guard = self.locks.acquire(&record.username).await;
        self.store.put(record.clone()).await?;

        tracing::info!(
            username = %record.username,
            edges = record.edges.as_ref().map(Vec::len),
            "user registered"
        );
        Ok(record)
    }

    /// Check a login attempt. `inputs` is the request's flat or nested
    /// input array; it is only parsed once the user is known, so an unknown
    /// user is always a 404.
    pub async fn login(&self, username: &str, inputs: &Value, proof: &Proof) -> Result<(), AppError> {
        // Snapshot under the lock; the verifier runs without it.
        let record = {
            let _guard = self.locks.acquire(username).await;
            self.store.get(username).await?
        }
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        let inputs = flatten_inputs(inputs)?;
        if inputs.len() < 2 {
            return Err(AppError::Validation(format!(
                "inputs must hold at least 2 values, got {}",
                inputs.len()
            )));
        }

        let submitted = &inputs[inputs.len() - 2..];
        if submitted != record.stored_hash.as_slice() {
            tracing::warn!(username, "stored hash mismatch, proof not verified");
            return Err(AppError::CommitmentMismatch(username.to_string()));
        }

        let verification = self
            .engine
            .verify(proof, &inputs, &self.verification_key);
        let outcome = match tokio::time::timeout(self.verify_timeout, verification).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                tracing::warn!(username, error = %err, "verifier error");
                return Err(AppError::VerificationFailure(err.to_string()));
            }
            Err(_) => {
                tracing::warn!(username, timeout = ?self.verify_timeout, "verifier timed out");
                return Err(AppError::VerificationFailure(format!(
                    "verifier timed out after {:?}",
                    self.verify_timeout
                )));
            }
        };

        match outcome {
            VerifyOutcome::Passed => {
                tracing::info!(username, "login succeeded");
                Ok(())
            }
            VerifyOutcome::Failed => {
                tracing::warn!(username, "proof rejected by verifier");
                Err(AppError::VerificationFailure("proof rejected".to_string()))
            }
            VerifyOutcome::Malformed(output) => {
                tracing::warn!(username, %output, "unrecognized verifier output");
                Err(AppError::VerificationFailure(format!(
                    "unrecognized verifier output: {}",
                    output
                )))
            }
        }
    }
}

/// Usernames are credential fields: `:` would make `username:password:salt`
/// ambiguous.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.len() > MAX_USERNAME_BYTES {
        return Err(AppError::Validation(format!(
            "Username must be 1-{} bytes",
            MAX_USERNAME_BYTES
        )));
    }
    if username.contains(':') || username.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "Username must not contain ':' or control characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_edges(edges: &[Edge]) -> Result<(), AppError> {
    match edges.iter().find(|(u, v)| u >= v) {
        Some((u, v)) => Err(AppError::Validation(format!(
            "Edge ({}, {}) must satisfy u < v",
            u, v
        ))),
        None => Ok(()),
    }
}
