// src/prompt/mod.rs
// Prompt rendering for document-editing requests

pub mod builder;

pub use builder::{EMPTY_SLOT, PromptRequest, render};
