use thiserror::Error;

use crate::circuit::EncodingError;
use crate::prover::EngineError;

/// Public text for both kinds of rejected login, so a response does not
/// tell a wrong commitment apart from a bad proof.
pub const REJECTED_MESSAGE: &str = "Invalid credentials";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Commitment mismatch for {0}")]
    CommitmentMismatch(String),

    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),

    #[error("Verification failed: {0}")]
    VerificationFailure(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CommitmentMismatch(_) | AppError::VerificationFailure(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::Encoding(_) => StatusCode::BAD_REQUEST,
            AppError::ProofGeneration(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UserNotFound(_) => "User not found".to_string(),
            AppError::CommitmentMismatch(_) | AppError::VerificationFailure(_) => {
                REJECTED_MESSAGE.to_string()
            }
            AppError::Validation(_) | AppError::Encoding(_) | AppError::ProofGeneration(_) => {
                self.to_string()
            }
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Engine failures on the proving side. The verify path classifies its own
/// failures as [`AppError::VerificationFailure`].
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::ProofGeneration(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.public_message(),
        });

        (status, axum::Json(body)).into_response()
    }
}
