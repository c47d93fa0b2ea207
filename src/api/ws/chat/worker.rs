// src/api/ws/chat/worker.rs
// Per-connection processing loop: frames are handled one at a time, in order

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::connection::ReplySender;
use super::pipeline::EditPipeline;
use super::registry::{ConnectionRegistry, ServedUsers};
use crate::api::error::{GatewayError, GatewayResult};
use crate::api::ws::message::EditRequest;

pub struct ConnectionWorker {
    pipeline: EditPipeline,
    replies: Arc<dyn ReplySender>,
    connection_user: Option<String>,
    served: Arc<ServedUsers>,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionWorker {
    pub fn new(
        pipeline: EditPipeline,
        replies: Arc<dyn ReplySender>,
        connection_user: Option<String>,
        served: Arc<ServedUsers>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            pipeline,
            replies,
            connection_user,
            served,
            registry,
        }
    }

    /// Drain `frames` until the queue closes or `cancel` fires. A request that
    /// is in flight when `cancel` fires is dropped with no context update and
    /// no reply, and the run ends with `ConnectionLost`.
    pub async fn run(
        self,
        mut frames: mpsc::Receiver<String>,
        cancel: CancellationToken,
    ) -> GatewayResult<()> {
        loop {
            let text = tokio::select! {
                _ = cancel.cancelled() => break,
                next = frames.recv() => match next {
                    Some(text) => text,
                    None => break,
                },
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Connection closed mid-request; discarding result");
                    return Err(GatewayError::ConnectionLost);
                }
                _ = self.handle_frame(&text) => {}
            }
        }
        Ok(())
    }

    pub async fn handle_frame(&self, text: &str) {
        let request = match EditRequest::decode(text, self.connection_user.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejecting message: {}", e);
                if let Err(send_err) = self.replies.send_error(&e).await {
                    debug!("Could not deliver rejection: {}", send_err);
                }
                return;
            }
        };

        self.served.track(&request.user_id, &self.registry).await;

        let sent = match self.pipeline.process(&request).await {
            Ok(response) => self.replies.send_response(response).await,
            Err(e) => {
                error!(
                    "Request for {}/{} failed: {}",
                    request.user_id, request.document_id, e
                );
                self.replies.send_error(&e).await
            }
        };

        if let Err(e) = sent {
            debug!("Reply not delivered: {}", e);
        }
    }
}
