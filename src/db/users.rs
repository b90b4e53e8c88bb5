use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::time::Duration;

use crate::db::models::{UserRecord, UserRow};
use crate::error::AppError;

/// Key-value store of registered users.
///
/// `put` is an upsert with last-write-wins semantics. Implementations only
/// guarantee that each call is atomic on its own; serializing a
/// read-then-write cycle per username is the caller's job (see
/// [`crate::auth::UserLocks`]).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn put(&self, record: UserRecord) -> Result<(), AppError>;

    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AppError>;
}

#[derive(Clone)]
pub struct SqliteUserStore {
    pool: Pool<Sqlite>,
}

impl SqliteUserStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn put(&self, record: UserRecord) -> Result<(), AppError> {
        let edges = record
            .edges
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Failed to encode edges: {}", e)))?;

        sqlx::query(
            r#"
INSERT INTO users (username, stored_hash_hi, stored_hash_lo, edges, updated_at)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT(username) DO UPDATE SET
    stored_hash_hi = excluded.stored_hash_hi,
    stored_hash_lo = excluded.stored_hash_lo,
    edges = excluded.edges,
    updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.username)
        .bind(record.stored_hash[0].to_string())
        .bind(record.stored_hash[1].to_string())
        .bind(edges)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, stored_hash_hi, stored_hash_lo, edges, updated_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }
}
