// src/lib.rs

pub mod api;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod state;
