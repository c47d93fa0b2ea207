// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use doc_ai_editor::api;
use doc_ai_editor::config::EditorConfig;
use doc_ai_editor::state::AppState;

/// Websocket backend for the Doc AI Editor chat panel
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Bind host (overrides DOC_EDITOR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides DOC_EDITOR_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level (overrides DOC_EDITOR_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Use the offline echo provider instead of the remote API
    #[arg(
        long,
        env = "DOC_EDITOR_MOCK_MODE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    mock: bool,
}

impl Args {
    fn apply(self, config: &mut EditorConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if self.mock {
            config.completion.mock_mode = true;
        }
    }
}

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = EditorConfig::from_env().context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.logging.max_level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Doc AI Editor backend v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Model: {} | Mock mode: {} | Session retention: {}",
        config.completion.model, config.completion.mock_mode, config.session.retention
    );

    let bind_address = config.bind_address();
    let app_state = Arc::new(AppState::from_config(config)?);
    let app = api::router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("WebSocket server listening on ws://{}/ws", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutdown complete");
    Ok(())
}
