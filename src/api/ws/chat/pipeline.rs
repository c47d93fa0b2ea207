// src/api/ws/chat/pipeline.rs
// One editing request: context lookup, prompt, completion, context update

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::api::error::GatewayResult;
use crate::api::ws::message::EditRequest;
use crate::llm::{CompletionClient, complete_with_timeout};
use crate::prompt::PromptRequest;
use crate::session::ContextStore;

#[derive(Clone)]
pub struct EditPipeline {
    store: Arc<dyn ContextStore>,
    completion: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl EditPipeline {
    pub fn new(
        store: Arc<dyn ContextStore>,
        completion: Arc<dyn CompletionClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            completion,
            timeout,
        }
    }

    /// Run a request end to end and return the reply text.
    ///
    /// The `(user, document)` key stays locked from the context read to the
    /// context write. A failed completion leaves the stored context untouched.
    pub async fn process(&self, request: &EditRequest) -> GatewayResult<String> {
        let _guard = self
            .store
            .lock(&request.user_id, &request.document_id)
            .await;

        let context = self
            .store
            .ensure(&request.user_id, &request.document_id)
            .await;

        let prompt = PromptRequest::new(&request.document_id, &request.message)
            .with_selection(request.selected_text.as_deref())
            .with_context(context.as_deref())
            .render();

        debug!(
            "Prompt for {}/{} ({} chars, prior context: {})",
            request.user_id,
            request.document_id,
            prompt.len(),
            context.is_some()
        );

        let response = complete_with_timeout(self.completion.as_ref(), &prompt, self.timeout).await?;

        self.store
            .update(&request.user_id, &request.document_id, response.clone())
            .await?;

        info!(
            "Updated context for {}/{} via {}",
            request.user_id,
            request.document_id,
            self.completion.name()
        );
        Ok(response)
    }
}
