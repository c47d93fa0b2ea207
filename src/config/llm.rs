// src/config/llm.rs
// Completion provider configuration (OpenAI-compatible chat completions)

use std::time::Duration;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use super::helpers::{env_bool, env_or, env_parsed};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Swap the remote provider for the offline echo provider
    pub mock_mode: bool,
}

impl CompletionConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env_or("OPENAI_API_KEY", ""),
            model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: env_parsed("COMPLETION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            mock_mode: env_bool("DOC_EDITOR_MOCK_MODE", false),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mock_mode && self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "OPENAI_API_KEY is required unless DOC_EDITOR_MOCK_MODE is enabled"
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow!("OPENAI_MODEL cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("COMPLETION_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock_mode: false,
        }
    }
}
