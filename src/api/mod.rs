// src/api/mod.rs
// HTTP + websocket surface of the editor backend

pub mod error;
pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{GatewayError, GatewayResult};

use crate::state::AppState;

/// Build the full router. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`; the websocket
/// handlers log the peer address.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::root))
        .route("/health", get(http::health_check))
        .route("/ws", get(ws::ws_chat_handler))
        .route("/ws/{user_id}", get(ws::ws_user_chat_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
