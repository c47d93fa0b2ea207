// src/llm/mod.rs
// Completion provider abstraction and implementations

pub mod provider;
pub mod timeout;

pub use provider::{
    CompletionClient, CompletionError, CompletionResult, EchoCompletionClient,
    OpenAiCompletionClient,
};
pub use timeout::complete_with_timeout;
