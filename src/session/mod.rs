// src/session/mod.rs
// Per-user, per-document conversation context kept in memory

pub mod locks;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub use locks::{KeyGuard, KeyedLocks};
pub use store::InMemoryContextStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No session for user {0}")]
    UnknownSession(String),
    #[error("No context for document {document} of user {user}")]
    UnknownDocument { user: String, document: String },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Read-only copy of a user's session, safe to hold across awaits
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub user_id: String,
    pub current_document: Option<String>,
    pub document_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Owner of every user session and document context.
///
/// Callers address records by `(user_id, document_id)` only and get owned
/// values back; nothing outside the store holds a reference into it.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Create the session and document record if missing, mark the document as
    /// current, and return its context. Never resets an existing context.
    async fn ensure(&self, user_id: &str, document_id: &str) -> Option<String>;

    async fn get(&self, user_id: &str, document_id: &str) -> Option<String>;

    /// Overwrite the context of a pair previously established with `ensure`.
    async fn update(&self, user_id: &str, document_id: &str, context: String) -> SessionResult<()>;

    /// Drop all state for a user. Returns whether a session existed.
    async fn release(&self, user_id: &str) -> bool;

    /// Serialize read-modify-write cycles on one `(user_id, document_id)` key.
    async fn lock(&self, user_id: &str, document_id: &str) -> KeyGuard;

    async fn snapshot(&self, user_id: &str) -> Option<SessionSnapshot>;

    async fn session_count(&self) -> usize;
}
