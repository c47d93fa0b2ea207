// src/llm/provider/openai.rs
// OpenAI-compatible chat completions client

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use super::{CompletionClient, CompletionError, CompletionResult};
use crate::config::CompletionConfig;

#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, model: String, base_url: String) -> CompletionResult<Self> {
        if api_key.trim().is_empty() {
            return Err(CompletionError::provider("OpenAI API key is required"));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn from_config(config: &CompletionConfig) -> CompletionResult<Self> {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn parse_response(&self, body: &Value) -> CompletionResult<String> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CompletionError::provider("Response contained no completion text"))?;

        if let Some(usage) = body.get("usage") {
            debug!(
                "Completion usage: {} prompt tokens, {} completion tokens",
                usage["prompt_tokens"].as_i64().unwrap_or(0),
                usage["completion_tokens"].as_i64().unwrap_or(0)
            );
        }

        Ok(content.to_string())
    }
}

/// Wire-safe message for a failed HTTP status; the raw body only goes to the log
fn status_message(status: reqwest::StatusCode) -> String {
    match status.as_u16() {
        401 => "Invalid API key".to_string(),
        403 => "API key does not have permission to use this model".to_string(),
        429 => "Rate limit exceeded. Please try again later.".to_string(),
        code if status.is_server_error() => format!("Provider unavailable ({})", code),
        code => format!("Provider rejected the request ({})", code),
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let start = Instant::now();
        debug!(
            "Sending completion request to {} ({} prompt chars)",
            self.model,
            prompt.len()
        );

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                CompletionError::provider("Could not reach the completion provider")
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Provider returned {}: {}", status, error_text);
            return Err(CompletionError::Provider(status_message(status)));
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to decode provider response: {}", e);
            CompletionError::provider("Provider returned an unreadable response")
        })?;

        let content = self.parse_response(&body)?;
        info!(
            "Completion from {} in {}ms ({} chars)",
            self.model,
            start.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }
}
