//! # Chat Handler
//!
//! Answers one user message from the knowledge base. The response never carries the
//! lead sentinel; a fallback is expressed through `needsLead`.

use super::{text_field, AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use supportpilot::AssistantReply;
use tracing::info;

// --- API Payloads ---

/// A missing `message` is treated like a blank one so both get the same 400.
#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

/// The handler for `POST /chat`.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<AssistantReply>, AppError> {
    let Json(payload) = payload?;
    let message = text_field(payload.message).unwrap_or_default();
    info!(message_len = message.len(), "Received chat message.");

    let reply = app_state.support_client.answer(&message).await?;

    info!(needs_lead = reply.needs_lead, "Chat message answered.");
    Ok(Json(reply))
}
