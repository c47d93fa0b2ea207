// src/api/ws/chat/mod.rs
// Websocket upgrade handlers and the per-connection receive loop

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{ConnectInfo, Path, Query, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub mod connection;
pub mod pipeline;
pub mod registry;
pub mod worker;

pub use connection::{ReplySender, WebSocketConnection};
pub use pipeline::EditPipeline;
pub use registry::{ConnectionRegistry, ServedUsers};
pub use worker::ConnectionWorker;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    user_id: Option<String>,
}

/// `GET /ws` - identity from `?user_id=` or, failing that, from each message
pub async fn ws_chat_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    let user_id = query.user_id.filter(|u| !u.trim().is_empty());
    match &user_id {
        Some(user) => info!("WebSocket upgrade request from {} for user {}", addr, user),
        None => info!(
            "WebSocket upgrade request from {} without user (per-message identity)",
            addr
        ),
    }

    ws.on_upgrade(move |socket| handle_socket(socket, app_state, addr, user_id))
}

/// `GET /ws/{user_id}` - identity bound by the path
pub async fn ws_user_chat_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("WebSocket upgrade request from {} for user {}", addr, user_id);
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, addr, Some(user_id)))
}

async fn handle_socket(
    socket: WebSocket,
    app_state: Arc<AppState>,
    addr: SocketAddr,
    user_id: Option<String>,
) {
    let connection_id = Uuid::new_v4();
    let connection_start = Instant::now();
    let (sender, mut receiver) = socket.split();
    let connection = Arc::new(WebSocketConnection::new(sender));

    let registry = app_state.connections.clone();
    let served = Arc::new(ServedUsers::new());
    if let Some(user) = &user_id {
        served.track(user, &registry).await;
        info!(
            "WebSocket client {} connected from {} as {} ({} open)",
            connection_id,
            addr,
            user,
            registry.connections_for(user).await
        );
    } else {
        info!("WebSocket client {} connected from {}", connection_id, addr);
    }

    if let Err(e) = connection.send_connection_ready(user_id.as_deref()).await {
        error!("Failed to send connection ready message: {}", e);
        finish_connection(&app_state, &served).await;
        return;
    }

    let cancel = CancellationToken::new();
    let (frames_tx, frames_rx) = mpsc::channel::<String>(app_state.config.ws.queue_depth);
    let worker = ConnectionWorker::new(
        app_state.pipeline(),
        connection.clone(),
        user_id.clone(),
        served.clone(),
        registry.clone(),
    );
    let worker_handle = tokio::spawn(worker.run(frames_rx, cancel.clone()));

    // Receive loop
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Frame from {}: {} bytes", connection_id, text.len());
                if frames_tx.send(text.as_str().to_owned()).await.is_err() {
                    warn!("Worker for {} stopped; closing", connection_id);
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if let Err(e) = connection.send_pong(data).await {
                    error!("Failed to send pong: {}", e);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} initiated close", connection_id);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }

        if connection.is_closed().await {
            break;
        }
    }

    // Stop the worker first so no in-flight request outlives the connection
    cancel.cancel();
    drop(frames_tx);
    match worker_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            info!("Worker for {} stopped: {} ({})", connection_id, e, e.code());
        }
        Err(e) => error!("Worker for {} panicked: {}", connection_id, e),
    }

    connection.close().await;
    finish_connection(&app_state, &served).await;

    info!(
        "WebSocket client {} disconnected from {} after {:.2}s",
        connection_id,
        addr,
        connection_start.elapsed().as_secs_f64()
    );
}

/// Detach the connection's users and apply the retention policy.
async fn finish_connection(app_state: &AppState, served: &ServedUsers) {
    let release_from = app_state
        .config
        .session
        .retention
        .releases_on_disconnect()
        .then(|| &*app_state.store);
    let last_for = served
        .detach_all(&app_state.connections, release_from)
        .await;
    if !last_for.is_empty() {
        debug!("Last connection closed for {:?}", last_for);
    }
}
