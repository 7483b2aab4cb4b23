//! # Lead Handler

use super::{text_field, AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- API Payloads ---

/// Every field is optional on the wire and may be any JSON scalar; `phone` and
/// `question` are checked by the library so a missing field and a blank one produce
/// the same 400.
#[derive(Deserialize, Debug, Default)]
pub struct LeadPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub question: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LeadResponse {
    pub ok: bool,
}

/// The handler for `POST /lead`.
pub async fn lead_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<LeadPayload>, JsonRejection>,
) -> Result<Json<LeadResponse>, AppError> {
    let Json(payload) = payload?;
    let name = text_field(payload.name);
    let phone = text_field(payload.phone).unwrap_or_default();
    let question = text_field(payload.question).unwrap_or_default();

    app_state
        .support_client
        .submit_lead(name.as_deref(), &phone, &question)
        .await?;

    Ok(Json(LeadResponse { ok: true }))
}
