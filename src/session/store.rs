// src/session/store.rs
// In-memory context store: user id -> session -> document contexts

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    ContextStore, KeyGuard, KeyedLocks, SessionError, SessionResult, SessionSnapshot,
};

/// Latest completion output recorded for one document
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserSession {
    pub current_document: Option<String>,
    pub documents: HashMap<String, DocumentContext>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl UserSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            current_document: None,
            documents: HashMap::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn mark_active(&mut self) {
        self.last_active = Utc::now();
    }
}

impl Default for UserSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide store, constructed once at startup and shared through `AppState`
#[derive(Default)]
pub struct InMemoryContextStore {
    sessions: RwLock<HashMap<String, UserSession>>,
    locks: KeyedLocks,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn ensure(&self, user_id: &str, document_id: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id.to_string()).or_insert_with(|| {
            debug!("Creating session for user {}", user_id);
            UserSession::new()
        });

        let document = session
            .documents
            .entry(document_id.to_string())
            .or_default()
            .context
            .clone();

        session.current_document = Some(document_id.to_string());
        session.mark_active();
        document
    }

    async fn get(&self, user_id: &str, document_id: &str) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .and_then(|session| session.documents.get(document_id))
            .and_then(|doc| doc.context.clone())
    }

    async fn update(&self, user_id: &str, document_id: &str, context: String) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(user_id)
            .ok_or_else(|| SessionError::UnknownSession(user_id.to_string()))?;

        let document =
            session
                .documents
                .get_mut(document_id)
                .ok_or_else(|| SessionError::UnknownDocument {
                    user: user_id.to_string(),
                    document: document_id.to_string(),
                })?;

        document.context = Some(context);
        session.mark_active();
        Ok(())
    }

    async fn release(&self, user_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(user_id).is_some();
        self.locks.prune_user(user_id);
        if removed {
            debug!("Released session for user {}", user_id);
        }
        removed
    }

    async fn lock(&self, user_id: &str, document_id: &str) -> KeyGuard {
        self.locks.acquire(user_id, document_id).await
    }

    async fn snapshot(&self, user_id: &str) -> Option<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(user_id)?;

        let mut document_ids: Vec<String> = session.documents.keys().cloned().collect();
        document_ids.sort();

        Some(SessionSnapshot {
            user_id: user_id.to_string(),
            current_document: session.current_document.clone(),
            document_ids,
            created_at: session.created_at,
            last_active: session.last_active,
        })
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
