// src/api/ws/mod.rs
// Websocket API: frame types and the chat gateway

pub mod chat;
pub mod message;

pub use chat::{ws_chat_handler, ws_user_chat_handler};
pub use message::{EditRequest, WsServerMessage};
