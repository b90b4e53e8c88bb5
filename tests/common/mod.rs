#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use zk_graph_auth::api::{create_router, AppState};
use zk_graph_auth::auth::AuthService;
use zk_graph_auth::circuit::{CircuitInputs, FieldElement};
use zk_graph_auth::config::Config;
use zk_graph_auth::crypto::Credential;
use zk_graph_auth::db::MemoryUserStore;
use zk_graph_auth::prover::{EngineError, Proof, ProvingEngine, VerifyOutcome, Witness};

#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Pass,
    Fail,
    Malformed,
    Crash,
    Hang,
}

/// Proving engine double that answers `verify` with a fixed verdict and
/// counts how often it was asked.
pub struct StubEngine {
    verdict: Verdict,
    verify_calls: AtomicUsize,
}

impl StubEngine {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            verify_calls: AtomicUsize::new(0),
        })
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProvingEngine for StubEngine {
    async fn compute_witness(
        &self,
        _program: &Path,
        inputs: &CircuitInputs,
    ) -> Result<Witness, EngineError> {
        Ok(Witness(inputs.to_input_file().into_bytes()))
    }

    async fn generate_proof(
        &self,
        _program: &Path,
        _proving_key: &Path,
        witness: &Witness,
    ) -> Result<Proof, EngineError> {
        Ok(Proof(json!({ "scheme": "stub", "witness_len": witness.0.len() })))
    }

    async fn verify(
        &self,
        _proof: &Proof,
        _inputs: &[FieldElement],
        _verification_key: &Path,
    ) -> Result<VerifyOutcome, EngineError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Verdict::Pass => Ok(VerifyOutcome::Passed),
            Verdict::Fail => Ok(VerifyOutcome::Failed),
            Verdict::Malformed => Ok(VerifyOutcome::Malformed(String::new())),
            Verdict::Crash => Err(EngineError::Exited {
                step: "verify",
                status: "exit status: 101".to_string(),
                stderr: "panicked".to_string(),
            }),
            Verdict::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(VerifyOutcome::Passed)
            }
        }
    }
}

pub const VERIFY_TIMEOUT: Duration = Duration::from_millis(200);

pub fn auth_service(engine: Arc<StubEngine>) -> AuthService {
    AuthService::new(
        Arc::new(MemoryUserStore::new()),
        engine,
        "zk/verification.key",
        VERIFY_TIMEOUT,
    )
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        request_timeout_secs: 30,
        zokrates_bin: "zokrates".into(),
        verification_key: "zk/verification.key".into(),
        verify_timeout_secs: 1,
    }
}

pub fn app(engine: Arc<StubEngine>) -> axum::Router {
    create_router(AppState {
        auth: auth_service(engine),
        config: Arc::new(test_config()),
    })
}

pub fn alice() -> Credential {
    Credential::new("alice", "mypassword1234", "random_salt")
}
