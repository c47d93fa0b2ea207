// src/llm/provider/mod.rs
// Completion client trait - one prompt in, one reply out

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod echo;
pub mod openai;

pub use echo::EchoCompletionClient;
pub use openai::OpenAiCompletionClient;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Network, authentication, rate limit or provider-side failure
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

impl CompletionError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// Universal completion provider interface
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> CompletionResult<String>;
}
