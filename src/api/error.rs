// src/api/error.rs
// Gateway error taxonomy and its wire representation

use thiserror::Error;

use crate::llm::CompletionError;
use crate::session::SessionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Connection lost")]
    ConnectionLost,
}

impl GatewayError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMessage(msg.into())
    }

    /// Stable code sent in error frames
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MalformedMessage(_) => "MALFORMED_MESSAGE",
            GatewayError::Completion(CompletionError::Provider(_)) => "PROVIDER_ERROR",
            GatewayError::Completion(CompletionError::Timeout(_)) => "TIMEOUT",
            GatewayError::Session(_) => "INTERNAL_ERROR",
            GatewayError::ConnectionLost => "CONNECTION_LOST",
        }
    }

    /// Text for the client; never a raw provider payload
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::MalformedMessage(reason) => format!("Invalid message: {}", reason),
            GatewayError::Completion(CompletionError::Provider(reason)) => {
                format!("The AI provider failed to respond: {}", reason)
            }
            GatewayError::Completion(CompletionError::Timeout(after)) => format!(
                "The AI provider did not respond within {}s",
                after.as_secs()
            ),
            GatewayError::Session(_) => {
                "Your session ended while the request was processing".to_string()
            }
            GatewayError::ConnectionLost => "Connection lost".to_string(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
