use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::models::UserRecord;
use crate::db::users::UserStore;
use crate::error::AppError;

/// Process-local store, for tests and throwaway servers.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn put(&self, record: UserRecord) -> Result<(), AppError> {
        self.users
            .write()
            .await
            .insert(record.username.clone(), record);
        Ok(())
    }

    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
