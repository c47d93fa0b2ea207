// tests/http_endpoints.rs

mod common;

use std::sync::Arc;

use common::*;
use doc_ai_editor::config::SessionRetention;
use serde_json::{Value, json};

#[tokio::test]
async fn test_root_returns_welcome() {
    let server = spawn_server(
        Arc::new(ScriptedClient::default()),
        SessionRetention::ReleaseOnDisconnect,
        5,
    )
    .await;

    let response = reqwest::get(server.http_url("/")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Welcome to Doc AI Editor!"}));
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let server = spawn_server(
        Arc::new(ScriptedClient::default()),
        SessionRetention::Retain,
        5,
    )
    .await;
    server.state.store.ensure("alice", "doc1").await;
    server.state.store.ensure("bob", "doc1").await;

    let body: Value = reqwest::get(server.http_url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "scripted");
    assert_eq!(body["sessions"], 2);
    assert_eq!(body["connected_users"], 0);
}
