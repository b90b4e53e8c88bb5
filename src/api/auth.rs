use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::state::AppState;
use crate::auth::Registration;
use crate::circuit::FieldElement;
use crate::error::AppError;
use crate::graph::Edge;
use crate::prover::Proof;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub stored_hash: [FieldElement; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    /// Flat or nested array of field elements; see [`crate::auth::flatten_inputs`].
    pub inputs: Value,
    pub proof: Proof,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let record = state
        .auth
        .register(Registration {
            username: req.username,
            stored_hash: req.stored_hash,
            edges: req.edges,
        })
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        message: format!("Registered {}", record.username),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    state.auth.login(&req.username, &req.inputs, &req.proof).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: format!("Login successful for {}", req.username),
    }))
}
