// src/state.rs
// Application state shared across handlers, built once at startup

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::ws::chat::{ConnectionRegistry, EditPipeline};
use crate::config::EditorConfig;
use crate::llm::{CompletionClient, EchoCompletionClient, OpenAiCompletionClient};
use crate::session::{ContextStore, InMemoryContextStore};

#[derive(Clone)]
pub struct AppState {
    pub config: EditorConfig,
    pub store: Arc<dyn ContextStore>,
    pub completion: Arc<dyn CompletionClient>,
    pub connections: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(
        config: EditorConfig,
        store: Arc<dyn ContextStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
            connections: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Wire the in-memory store and the configured provider.
    pub fn from_config(config: EditorConfig) -> Result<Self> {
        let completion: Arc<dyn CompletionClient> = if config.completion.mock_mode {
            info!("Mock mode enabled: using the offline echo provider");
            Arc::new(EchoCompletionClient::new())
        } else {
            Arc::new(OpenAiCompletionClient::from_config(&config.completion)?)
        };

        Ok(Self::new(
            config,
            Arc::new(InMemoryContextStore::new()),
            completion,
        ))
    }

    /// Pipeline handle for one connection's worker
    pub fn pipeline(&self) -> EditPipeline {
        EditPipeline::new(
            self.store.clone(),
            self.completion.clone(),
            self.config.completion.timeout(),
        )
    }
}
