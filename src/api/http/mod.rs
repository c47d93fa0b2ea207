// src/api/http/mod.rs
// Plain HTTP endpoints

pub mod health;

pub use health::{WELCOME_MESSAGE, health_check, root};
