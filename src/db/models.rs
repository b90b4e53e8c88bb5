use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::circuit::FieldElement;
use crate::error::AppError;
use crate::graph::Edge;

/// Server-side state for one username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub stored_hash: [FieldElement; 2],
    pub edges: Option<Vec<Edge>>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub username: String,
    pub stored_hash_hi: String,
    pub stored_hash_lo: String,
    pub edges: Option<String>,
    pub updated_at: i64,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let parse = |text: &str| {
            text.parse::<FieldElement>()
                .map_err(|e| AppError::Internal(format!("Corrupt stored hash for {}: {}", row.username, e)))
        };
        let stored_hash = [parse(&row.stored_hash_hi)?, parse(&row.stored_hash_lo)?];

        let edges = row
            .edges
            .as_deref()
            .map(serde_json::from_str::<Vec<Edge>>)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Corrupt edge list for {}: {}", row.username, e)))?;

        Ok(UserRecord {
            username: row.username,
            stored_hash,
            edges,
            updated_at: row.updated_at,
        })
    }
}
