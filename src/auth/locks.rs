use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per username.
///
/// Serializes the store read/write cycle for a single username while leaving
/// different usernames fully concurrent.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, username: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(username.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop entries nobody holds or waits on.
    pub async fn cleanup(&self) {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_serialized() {
        let locks = UserLocks::new();
        let guard = locks.acquire("alice").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("alice").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_users_not_blocked() {
        let locks = UserLocks::new();
        let _alice = locks.acquire("alice").await;
        tokio::time::timeout(Duration::from_secs(1), locks.acquire("bob"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_keeps_held_locks() {
        let locks = UserLocks::new();
        let held = locks.acquire("alice").await;
        drop(locks.acquire("bob").await);
        assert_eq!(locks.len().await, 2);

        locks.cleanup().await;
        assert_eq!(locks.len().await, 1);

        drop(held);
        locks.cleanup().await;
        assert_eq!(locks.len().await, 0);
    }
}
