use super::{AppError, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use supportpilot::ModelInfo;

#[derive(Serialize, Deserialize, Debug)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// The handler for `GET /models`. Lists what the configured credential can use.
pub async fn models_handler(
    State(app_state): State<AppState>,
) -> Result<Json<ModelsResponse>, AppError> {
    let models = app_state.support_client.list_models().await?;
    Ok(Json(ModelsResponse { models }))
}
