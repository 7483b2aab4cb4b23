//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `supportpilot-server`.

pub mod chat;
pub mod general;
pub mod lead;
pub mod models;

// Re-export all handlers so the router can reach them under a single `handlers::` path.
pub use chat::*;
pub use general::*;
pub use lead::*;
pub use models::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};

/// Reads a loosely typed JSON field as text. Numbers and booleans keep their JSON
/// spelling, so `"phone": 812345678` is accepted. A missing or `null` field is `None`.
fn text_field(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
