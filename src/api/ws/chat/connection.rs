// src/api/ws/chat/connection.rs
// A wrapper around the websocket sink that tracks closure and serializes sends.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures::SinkExt;
use futures::stream::SplitSink;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::error::GatewayError;
use crate::api::ws::message::WsServerMessage;

/// Destination for replies produced while processing a connection's messages.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_message(&self, msg: WsServerMessage) -> Result<()>;

    async fn send_response(&self, response: String) -> Result<()> {
        self.send_message(WsServerMessage::Response { response }).await
    }

    async fn send_error(&self, err: &GatewayError) -> Result<()> {
        self.send_message(WsServerMessage::from(err)).await
    }
}

/// Manages the sending side of a single websocket connection.
pub struct WebSocketConnection {
    sender: Mutex<SplitSink<WebSocket, Message>>,
    is_closed: Mutex<bool>,
}

impl WebSocketConnection {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sender: Mutex::new(sender),
            is_closed: Mutex::new(false),
        }
    }

    /// Mark this connection as closed to prevent further sends
    pub async fn mark_closed(&self) {
        *self.is_closed.lock().await = true;
        debug!("Connection marked as closed");
    }

    pub async fn is_closed(&self) -> bool {
        *self.is_closed.lock().await
    }

    async fn send_frame(&self, frame: Message) -> Result<()> {
        if self.is_closed().await {
            debug!("Skipping send on closed connection");
            return Ok(());
        }

        let mut sender = self.sender.lock().await;

        if let Err(e) = sender.send(frame).await {
            warn!("Failed to send frame (connection likely closed): {}", e);
            drop(sender);
            self.mark_closed().await;
            return Err(e.into());
        }

        if let Err(e) = sender.flush().await {
            warn!("Failed to flush frame (connection likely closed): {}", e);
            drop(sender);
            self.mark_closed().await;
            return Err(e.into());
        }

        Ok(())
    }

    pub async fn send_connection_ready(&self, user_id: Option<&str>) -> Result<()> {
        self.send_message(WsServerMessage::ConnectionReady {
            user_id: user_id.map(str::to_string),
        })
        .await
    }

    pub async fn send_pong(&self, data: Bytes) -> Result<()> {
        self.send_frame(Message::Pong(data)).await
    }

    /// Best-effort close frame; the peer may already be gone.
    pub async fn close(&self) {
        if self.is_closed().await {
            return;
        }
        if let Err(e) = self.sender.lock().await.close().await {
            debug!("Close after disconnect: {}", e);
        }
        self.mark_closed().await;
    }
}

#[async_trait]
impl ReplySender for WebSocketConnection {
    async fn send_message(&self, msg: WsServerMessage) -> Result<()> {
        let json_str = serde_json::to_string(&msg)?;
        debug!("Sending WS message: {}", json_str);
        self.send_frame(Message::Text(Utf8Bytes::from(json_str))).await
    }
}
