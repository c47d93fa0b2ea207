// src/session/locks.rs
// Per-key async mutexes, created on demand and dropped once idle

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Key = (String, String);

/// Held for the duration of one read-modify-write cycle on a key.
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Default)]
pub struct KeyedLocks {
    table: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str, document_id: &str) -> KeyGuard {
        let slot = {
            let mut table = self.table.lock();
            table
                .entry((user_id.to_string(), document_id.to_string()))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        KeyGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Forget a user's idle locks. A lock still held or awaited elsewhere keeps
    /// a strong reference and is left in place.
    pub fn prune_user(&self, user_id: &str) {
        self.table
            .lock()
            .retain(|(user, _), slot| user != user_id || Arc::strong_count(slot) > 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().len()
    }
}
