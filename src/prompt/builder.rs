// src/prompt/builder.rs
// Fixed editing template with four slots: document, context, selection, request

/// Rendered in place of a missing or blank selection/context
pub const EMPTY_SLOT: &str = "(none)";

/// The four inputs of one editing prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub document_id: &'a str,
    pub selected_text: Option<&'a str>,
    pub message: &'a str,
    pub context: Option<&'a str>,
}

impl<'a> PromptRequest<'a> {
    pub fn new(document_id: &'a str, message: &'a str) -> Self {
        Self {
            document_id,
            selected_text: None,
            message,
            context: None,
        }
    }

    pub fn with_selection(mut self, selected_text: Option<&'a str>) -> Self {
        self.selected_text = selected_text;
        self
    }

    pub fn with_context(mut self, context: Option<&'a str>) -> Self {
        self.context = context;
        self
    }

    pub fn render(&self) -> String {
        format!(
            r#"You are an AI writing assistant embedded in a document editor.
You are helping the user edit the document "{}".

Previous context:
{}

Selected text:
{}

User request:
{}

Respond with the edited text or a direct answer to the request."#,
            self.document_id,
            slot(self.context),
            slot(self.selected_text),
            self.message
        )
    }
}

fn slot(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => EMPTY_SLOT,
    }
}

/// Render the editing prompt. Pure; absent inputs become `EMPTY_SLOT`.
pub fn render(
    document_id: &str,
    selected_text: Option<&str>,
    message: &str,
    context: Option<&str>,
) -> String {
    PromptRequest::new(document_id, message)
        .with_selection(selected_text)
        .with_context(context)
        .render()
}
