// tests/common/mod.rs
// Shared test server, scripted providers and websocket client helpers

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use doc_ai_editor::api::router;
use doc_ai_editor::config::{EditorConfig, SessionRetention};
use doc_ai_editor::llm::{CompletionClient, CompletionError, CompletionResult};
use doc_ai_editor::session::{
    ContextStore, InMemoryContextStore, KeyGuard, SessionResult, SessionSnapshot,
};
use doc_ai_editor::state::AppState;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server(
    completion: Arc<dyn CompletionClient>,
    retention: SessionRetention,
    timeout_secs: u64,
) -> TestServer {
    spawn_server_with_store(
        completion,
        Arc::new(InMemoryContextStore::new()),
        retention,
        timeout_secs,
    )
    .await
}

pub async fn spawn_server_with_store(
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn ContextStore>,
    retention: SessionRetention,
    timeout_secs: u64,
) -> TestServer {
    let mut config = EditorConfig::default();
    config.session.retention = retention;
    config.completion.timeout_secs = timeout_secs;

    let state = Arc::new(AppState::new(config, store, completion));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());

    let handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestServer {
        addr,
        state,
        handle,
    }
}

pub async fn connect(server: &TestServer, path: &str) -> WsClient {
    let (client, _) = tokio_tungstenite::connect_async(server.ws_url(path))
        .await
        .expect("Failed to connect");
    client
}

/// Connect and consume the `connection_ready` frame
pub async fn connect_ready(server: &TestServer, path: &str) -> WsClient {
    let mut client = connect(server, path).await;
    let ready = next_json(&mut client).await;
    assert_eq!(ready["type"], "connection_ready");
    client
}

pub async fn send_json(client: &mut WsClient, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame as JSON, skipping control frames
pub async fn next_json(client: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");

        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

/// Poll `check` until it holds or five seconds pass
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check().await {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Extract the prior-context slot from a rendered prompt
pub fn context_slot(prompt: &str) -> String {
    prompt
        .split_once("Previous context:\n")
        .and_then(|(_, rest)| rest.split_once("\n\nSelected text:"))
        .map(|(ctx, _)| ctx.to_string())
        .unwrap_or_default()
}

/// Extract the request slot from a rendered prompt
pub fn request_slot(prompt: &str) -> String {
    prompt
        .split_once("User request:\n")
        .and_then(|(_, rest)| rest.split_once("\n\nRespond with"))
        .map(|(req, _)| req.to_string())
        .unwrap_or_default()
}

/// Replies R1, R2, ... and records every prompt
#[derive(Default)]
pub struct ScriptedClient {
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let count = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.to_string());
            prompts.len()
        };
        Ok(format!("R{}", count))
    }
}

/// Reply chains the request onto the prior context: "req <- ctx"
pub struct ChainingClient;

#[async_trait]
impl CompletionClient for ChainingClient {
    fn name(&self) -> &'static str {
        "chaining"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        tokio::task::yield_now().await;
        Ok(format!("{} <- {}", request_slot(prompt), context_slot(prompt)))
    }
}

pub struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> CompletionResult<String> {
        Err(CompletionError::provider("Rate limit exceeded. Please try again later."))
    }
}

pub struct SlowClient(pub Duration);

#[async_trait]
impl CompletionClient for SlowClient {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        tokio::time::sleep(self.0).await;
        Ok(format!("slow reply to {}", request_slot(prompt)))
    }
}

/// In-memory store whose `release` pauses before dropping state
pub struct SlowReleaseStore {
    inner: InMemoryContextStore,
    delay: Duration,
    release_started: AtomicBool,
}

impl SlowReleaseStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryContextStore::new(),
            delay,
            release_started: AtomicBool::new(false),
        }
    }

    pub fn release_started(&self) -> bool {
        self.release_started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContextStore for SlowReleaseStore {
    async fn ensure(&self, user_id: &str, document_id: &str) -> Option<String> {
        self.inner.ensure(user_id, document_id).await
    }

    async fn get(&self, user_id: &str, document_id: &str) -> Option<String> {
        self.inner.get(user_id, document_id).await
    }

    async fn update(&self, user_id: &str, document_id: &str, context: String) -> SessionResult<()> {
        self.inner.update(user_id, document_id, context).await
    }

    async fn release(&self, user_id: &str) -> bool {
        self.release_started.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.release(user_id).await
    }

    async fn lock(&self, user_id: &str, document_id: &str) -> KeyGuard {
        self.inner.lock(user_id, document_id).await
    }

    async fn snapshot(&self, user_id: &str) -> Option<SessionSnapshot> {
        self.inner.snapshot(user_id).await
    }

    async fn session_count(&self) -> usize {
        self.inner.session_count().await
    }
}
