// src/llm/provider/echo.rs
// Offline provider for mock mode: answers without any network call

use async_trait::async_trait;

use super::{CompletionClient, CompletionResult};

const REQUEST_MARKER: &str = "User request:\n";

#[derive(Debug, Clone, Default)]
pub struct EchoCompletionClient;

impl EchoCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for EchoCompletionClient {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let request = prompt
            .rsplit_once(REQUEST_MARKER)
            .map(|(_, rest)| rest.lines().next().unwrap_or_default())
            .unwrap_or(prompt)
            .trim();

        Ok(format!("[mock] {}", request))
    }
}
