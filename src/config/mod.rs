// src/config/mod.rs
// Central configuration for the editor backend, composed of domain configs

pub mod helpers;
pub mod llm;
pub mod server;
pub mod session;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use llm::CompletionConfig;
pub use server::{LoggingConfig, ServerConfig, WsConfig};
pub use session::{SessionConfig, SessionRetention};

/// Main configuration structure, built once at startup and carried in `AppState`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    pub completion: CompletionConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub ws: WsConfig,
    pub session: SessionConfig,
}

impl EditorConfig {
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine in production
        dotenvy::dotenv().ok();

        Ok(Self {
            completion: CompletionConfig::from_env()?,
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env(),
            ws: WsConfig::from_env()?,
            session: SessionConfig::from_env()?,
        })
    }

    /// Validate config on startup
    pub fn validate(&self) -> Result<()> {
        self.completion.validate()?;
        self.ws.validate()?;
        self.logging.max_level()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
