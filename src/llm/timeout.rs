// src/llm/timeout.rs
// Bounded wait around a completion call

use std::time::Duration;

use tracing::warn;

use super::provider::{CompletionClient, CompletionError, CompletionResult};

/// Run one completion, failing with `CompletionError::Timeout` once `duration` elapses.
/// The pending request future is dropped on timeout.
pub async fn complete_with_timeout(
    client: &dyn CompletionClient,
    prompt: &str,
    duration: Duration,
) -> CompletionResult<String> {
    match tokio::time::timeout(duration, client.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} completion timed out after {:?}", client.name(), duration);
            Err(CompletionError::Timeout(duration))
        }
    }
}
