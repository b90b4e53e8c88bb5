use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::circuit::{CircuitInputs, FieldElement};
use crate::prover::{EngineError, Proof, ProvingEngine, VerifyOutcome, Witness};

const PASS_MARKER: &str = "PASSED";
const FAIL_MARKER: &str = "FAILED";

/// Runs the `zokrates` CLI. Every call works in its own scratch directory
/// and is killed when it overruns `timeout` or its future is dropped.
#[derive(Debug, Clone)]
pub struct ZokratesCli {
    binary: PathBuf,
    timeout: Duration,
}

impl ZokratesCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Children run inside a scratch directory, so every caller-supplied
    /// path is made absolute against the launch directory first.
    fn resolve(path: &Path) -> Result<PathBuf, EngineError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(std::env::current_dir()?.join(path))
    }

    /// A bare name is left to `PATH` lookup; anything with a separator is
    /// a path and resolved like the others.
    fn program(&self) -> Result<PathBuf, EngineError> {
        if self.binary.components().count() > 1 {
            Self::resolve(&self.binary)
        } else {
            Ok(self.binary.clone())
        }
    }

    async fn run(
        &self,
        step: &'static str,
        args: Vec<OsString>,
        workdir: &Path,
    ) -> Result<Output, EngineError> {
        let binary = self.program()?;
        tracing::debug!(step, binary = %binary.display(), "running zokrates");

        let child = Command::new(&binary)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: binary.display().to_string(),
                source,
            })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => {
                tracing::warn!(step, timeout = ?self.timeout, "zokrates timed out, killed");
                Err(EngineError::Timeout {
                    step,
                    after: self.timeout,
                })
            }
        }
    }

    fn require_success(step: &'static str, output: &Output) -> Result<(), EngineError> {
        if output.status.success() {
            return Ok(());
        }
        Err(EngineError::Exited {
            step,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Classify `zokrates verify` stdout.
pub fn classify_verify_output(stdout: &str) -> VerifyOutcome {
    if stdout.contains(FAIL_MARKER) {
        VerifyOutcome::Failed
    } else if stdout.contains(PASS_MARKER) {
        VerifyOutcome::Passed
    } else {
        VerifyOutcome::Malformed(stdout.trim().to_string())
    }
}

/// Check that the public inputs embedded in a ZoKrates proof are the public
/// part of `inputs`: the `2M` edge values and the two stored-hash values.
///
/// ZoKrates checks the proof against its own embedded inputs, so without
/// this a valid proof for another statement would pass.
pub fn check_public_inputs(proof: &Proof, inputs: &[FieldElement]) -> Result<(), String> {
    let embedded = proof
        .0
        .get("inputs")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "proof has no inputs array".to_string())?;

    if embedded.len() < 2 || embedded.len() % 2 != 0 {
        return Err(format!("proof carries {} public inputs", embedded.len()));
    }
    let edge_values = embedded.len() - 2;
    if inputs.len() < edge_values + 6 {
        return Err(format!(
            "proof carries {} public inputs, request has only {} values",
            embedded.len(),
            inputs.len()
        ));
    }

    let edges_start = inputs.len() - 6 - edge_values;
    let expected = inputs[edges_start..edges_start + edge_values]
        .iter()
        .chain(&inputs[inputs.len() - 2..]);

    for (position, (claimed, expected)) in embedded.iter().zip(expected).enumerate() {
        let claimed = claimed
            .as_str()
            .and_then(parse_hex_field)
            .ok_or_else(|| format!("public input #{position} is not a hex field element"))?;
        if claimed != *expected {
            return Err(format!("public input #{position} differs from the request"));
        }
    }
    Ok(())
}

/// `0x`-prefixed hex. Values above 128 bits cannot come from this circuit.
fn parse_hex_field(text: &str) -> Option<FieldElement> {
    let digits = text.strip_prefix("0x")?.trim_start_matches('0');
    if digits.is_empty() {
        return Some(FieldElement::ZERO);
    }
    u128::from_str_radix(digits, 16).ok().map(FieldElement)
}

#[async_trait]
impl ProvingEngine for ZokratesCli {
    async fn compute_witness(
        &self,
        program: &Path,
        inputs: &CircuitInputs,
    ) -> Result<Witness, EngineError> {
        let program = Self::resolve(program)?;
        let scratch = tempfile::tempdir()?;
        let witness_path = scratch.path().join("witness");

        let mut args: Vec<OsString> = vec![
            "compute-witness".into(),
            "-i".into(),
            program.into(),
            "-o".into(),
            witness_path.clone().into(),
            "-a".into(),
        ];
        args.extend(inputs.to_decimal_strings().into_iter().map(OsString::from));

        let output = self.run("compute-witness", args, scratch.path()).await?;
        Self::require_success("compute-witness", &output)?;

        Ok(Witness(tokio::fs::read(&witness_path).await?))
    }

    async fn generate_proof(
        &self,
        program: &Path,
        proving_key: &Path,
        witness: &Witness,
    ) -> Result<Proof, EngineError> {
        let program = Self::resolve(program)?;
        let proving_key = Self::resolve(proving_key)?;
        let scratch = tempfile::tempdir()?;
        let witness_path = scratch.path().join("witness");
        let proof_path = scratch.path().join("proof.json");
        tokio::fs::write(&witness_path, &witness.0).await?;

        let args: Vec<OsString> = vec![
            "generate-proof".into(),
            "-i".into(),
            program.into(),
            "-w".into(),
            witness_path.into(),
            "-p".into(),
            proving_key.into(),
            "-j".into(),
            proof_path.clone().into(),
        ];

        let output = self.run("generate-proof", args, scratch.path()).await?;
        Self::require_success("generate-proof", &output)?;

        let raw = tokio::fs::read(&proof_path).await?;
        Ok(Proof(serde_json::from_slice(&raw)?))
    }

    async fn verify(
        &self,
        proof: &Proof,
        inputs: &[FieldElement],
        verification_key: &Path,
    ) -> Result<VerifyOutcome, EngineError> {
        if let Err(reason) = check_public_inputs(proof, inputs) {
            return Ok(VerifyOutcome::Malformed(reason));
        }

        let verification_key = Self::resolve(verification_key)?;
        let scratch = tempfile::tempdir()?;
        let proof_path = scratch.path().join("proof.json");
        tokio::fs::write(&proof_path, serde_json::to_vec(&proof.0)?).await?;

        let args: Vec<OsString> = vec![
            "verify".into(),
            "-j".into(),
            proof_path.into(),
            "-v".into(),
            verification_key.into(),
        ];

        // A non-zero exit is not an error here: the marker decides, and no
        // marker means malformed.
        let output = self.run("verify", args, scratch.path()).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let outcome = classify_verify_output(&stdout);
        if !output.status.success() && outcome.is_pass() {
            return Ok(VerifyOutcome::Malformed(format!(
                "verifier exited with {} after reporting success",
                output.status
            )));
        }
        Ok(outcome)
    }
}
