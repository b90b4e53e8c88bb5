use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_graph_auth::{
    api::{create_router, AppState},
    auth::AuthService,
    config::Config,
    db::SqliteUserStore,
    error::AppError,
    prover::ZokratesCli,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zk_graph_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting zk-graph-auth server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    // Open the user store and run migrations
    let store = SqliteUserStore::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_min_connections,
    )
    .await?;
    tracing::info!("User store ready: {}", config.database_url);

    // Setup the verifier
    if !config.verification_key.exists() {
        tracing::warn!(
            "Verification key {} not found; every login will be rejected",
            config.verification_key.display()
        );
    }

    // The CLI timeout is a backstop; AuthService enforces verify_timeout itself.
    let engine = ZokratesCli::new(&config.zokrates_bin, config.verify_timeout() * 2);
    let auth = AuthService::new(
        Arc::new(store),
        Arc::new(engine),
        &config.verification_key,
        config.verify_timeout(),
    );

    // Spawn background task for idle lock cleanup
    {
        let locks = auth.locks().clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                locks.cleanup().await;
                tracing::debug!("Idle user locks cleaned up");
            }
        });
    }

    // Build router
    let state = AppState {
        auth,
        config: config.clone(),
    };
    let app = create_router(state);

    // Bind and serve
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("  GET  /api/health");
    tracing::info!("  POST /api/auth/register - store a graph commitment");
    tracing::info!("  POST /api/auth/login    - check commitment, verify proof");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
