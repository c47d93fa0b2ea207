// src/api/ws/chat/registry.rs
// Counts open connections per user so release only fires for the last one

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

use crate::session::ContextStore;

/// Attach and last-connection release share one lock: a user attaching while
/// their previous connection is being released waits until the release is
/// done, and so never sees its own fresh state wiped.
#[derive(Default)]
pub struct ConnectionRegistry {
    counts: AsyncMutex<HashMap<String, usize>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's open connection count after attaching.
    pub async fn attach(&self, user_id: &str) -> usize {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(user_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Drop one connection for the user. When it was the last one and
    /// `release_from` is given, the user's state is released before any other
    /// attach can proceed. Returns true when this was the last connection.
    pub async fn detach(&self, user_id: &str, release_from: Option<&dyn ContextStore>) -> bool {
        let mut counts = self.counts.lock().await;
        match counts.get_mut(user_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                counts.remove(user_id);
                if let Some(store) = release_from {
                    if store.release(user_id).await {
                        info!("Released session state for {}", user_id);
                    }
                }
                true
            }
            None => false,
        }
    }

    pub async fn connections_for(&self, user_id: &str) -> usize {
        self.counts.lock().await.get(user_id).copied().unwrap_or(0)
    }

    pub async fn active_users(&self) -> usize {
        self.counts.lock().await.len()
    }
}

/// Users a single connection has served, each attached to the registry once.
#[derive(Default)]
pub struct ServedUsers {
    users: Mutex<HashSet<String>>,
}

impl ServedUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user for this connection, attaching on first sight. Must
    /// complete before the user's context is touched.
    pub async fn track(&self, user_id: &str, registry: &ConnectionRegistry) {
        let first_sight = self.users.lock().insert(user_id.to_string());
        if first_sight {
            let open = registry.attach(user_id).await;
            info!("User {} now has {} open connection(s)", user_id, open);
        }
    }

    /// Detach every served user, releasing the state of those with no other
    /// open connection when `release_from` is given.
    pub async fn detach_all(
        &self,
        registry: &ConnectionRegistry,
        release_from: Option<&dyn ContextStore>,
    ) -> Vec<String> {
        let users: Vec<String> = self.users.lock().drain().collect();
        let mut last_for = Vec::new();
        for user in users {
            if registry.detach(&user, release_from).await {
                last_for.push(user);
            }
        }
        last_for
    }
}
