use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_graph_auth::{
    api::auth::LoginRequest,
    client::Enrollment,
    crypto::{Credential, GRAPH_RNG_VERSION},
    error::AppError,
    graph::DEFAULT_BASE_NODES,
    prover::{ProvingEngine, ZokratesCli},
};

/// Prover-side tooling: derive the graph and circuit artifacts from a
/// credential, and drive the proving engine.
#[derive(Parser)]
#[command(name = "graph-auth-client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write circuit.zok, input.txt and register.json
    Prepare {
        #[command(flatten)]
        credential: CredentialArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Compute the witness, generate a proof and write proof.json and login.json
    Prove {
        #[command(flatten)]
        credential: CredentialArgs,
        /// Compiled circuit
        #[arg(long)]
        program: PathBuf,
        #[arg(long)]
        proving_key: PathBuf,
        #[arg(long, default_value = "zokrates")]
        zokrates: PathBuf,
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    salt: String,
    #[arg(long, default_value_t = DEFAULT_BASE_NODES)]
    base_nodes: usize,
}

impl CredentialArgs {
    fn enroll(&self) -> Result<(Credential, Enrollment), AppError> {
        let credential = Credential::new(&self.username, &self.password, &self.salt);
        let enrollment = Enrollment::prepare(&credential, self.base_nodes)?;

        tracing::info!(
            rng = GRAPH_RNG_VERSION,
            nodes = enrollment.graph.node_count(),
            edges = enrollment.graph.edge_count(),
            graph_hash = %enrollment.graph_hash,
            "graph derived"
        );
        let greedy = enrollment.greedy_check();
        tracing::debug!(
            colors_used = greedy.colors_used,
            fits_three = greedy.fits_three(),
            "greedy coloring diagnostic"
        );
        Ok((credential, enrollment))
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let body = serde_json::to_vec_pretty(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", path.display(), e)))?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

async fn prepare(credential: &CredentialArgs, out: &Path) -> Result<(), AppError> {
    let (credential, enrollment) = credential.enroll()?;
    tokio::fs::create_dir_all(out).await?;

    tokio::fs::write(out.join("circuit.zok"), enrollment.circuit_source()).await?;
    tokio::fs::write(out.join("input.txt"), enrollment.inputs.to_input_file()).await?;
    write_json(
        &out.join("register.json"),
        &enrollment.register_request(&credential.username),
    )
    .await?;

    tracing::info!(
        inputs = enrollment.inputs.len(),
        "wrote circuit.zok, input.txt and register.json to {}",
        out.display()
    );
    Ok(())
}

async fn prove(
    credential: &CredentialArgs,
    program: &Path,
    proving_key: &Path,
    engine: &ZokratesCli,
    out: &Path,
) -> Result<(), AppError> {
    let (credential, enrollment) = credential.enroll()?;
    tokio::fs::create_dir_all(out).await?;

    let witness = engine.compute_witness(program, &enrollment.inputs).await?;
    tracing::info!(bytes = witness.0.len(), "witness computed");

    let proof = engine.generate_proof(program, proving_key, &witness).await?;
    tracing::info!("proof generated");

    write_json(&out.join("proof.json"), &proof).await?;
    write_json(
        &out.join("login.json"),
        &LoginRequest {
            username: credential.username.clone(),
            inputs: serde_json::json!(enrollment.inputs.to_decimal_strings()),
            proof,
        },
    )
    .await?;

    tracing::info!("wrote proof.json and login.json to {}", out.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zk_graph_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Prepare { credential, out } => prepare(&credential, &out).await,
        Command::Prove {
            credential,
            program,
            proving_key,
            zokrates,
            timeout_secs,
            out,
        } => {
            let engine = ZokratesCli::new(zokrates, Duration::from_secs(timeout_secs));
            prove(&credential, &program, &proving_key, &engine, &out).await
        }
    }
}
