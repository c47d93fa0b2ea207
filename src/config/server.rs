// src/config/server.rs
// Server, logging and websocket gateway configuration

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::Level;

use super::helpers::{env_or, env_parsed};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("DOC_EDITOR_HOST", "0.0.0.0"),
            port: env_parsed("DOC_EDITOR_PORT", 8000)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: env_or("DOC_EDITOR_LOG_LEVEL", "info"),
        }
    }

    pub fn max_level(&self) -> Result<Level> {
        self.level
            .trim()
            .parse::<Level>()
            .map_err(|_| anyhow!("Unknown log level: {}", self.level))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Websocket gateway tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsConfig {
    /// Messages a single connection may queue while its worker is busy
    pub queue_depth: usize,
}

impl WsConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            queue_depth: env_parsed("DOC_EDITOR_WS_QUEUE_DEPTH", 32)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_depth == 0 {
            return Err(anyhow!("DOC_EDITOR_WS_QUEUE_DEPTH must be at least 1"));
        }
        Ok(())
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self { queue_depth: 32 }
    }
}
