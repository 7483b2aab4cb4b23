//! # API Client
//!
//! This module provides a client for interacting with the `supportpilot-server` API.
//! It handles request construction and response parsing, and turns server error
//! bodies into the text shown in the conversation.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use supportpilot::{
    conversation::{LeadRequest, SupportBackend},
    errors::SupportError,
    types::{AssistantReply, ModelInfo},
};
use tracing::{info, warn};

/// The error body returned by every failing endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// A response from the `GET /models` endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// The client for making API calls to the `supportpilot-server`.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends one user message to `POST /chat`.
    pub async fn chat(&self, message: &str) -> Result<AssistantReply, SupportError> {
        let url = format!("{}/chat", self.base_url);
        info!("Sending chat message to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(unreachable_server)?;
        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| SupportError::Remote(format!("Unexpected response from server: {e}")))
    }

    /// Sends contact details to `POST /lead`.
    pub async fn lead(&self, lead: &LeadRequest) -> Result<(), SupportError> {
        let url = format!("{}/lead", self.base_url);
        info!("Submitting lead to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(lead)
            .send()
            .await
            .map_err(unreachable_server)?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Fetches the models available to the server's credential.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        info!("Fetching models from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!(
                "Failed to fetch models. Server responded with {}: {}",
                status,
                error_message(&error_text)
            );
        }

        let listing: ModelsResponse = response.json().await?;
        Ok(listing.models)
    }
}

#[async_trait]
impl SupportBackend for ApiClient {
    async fn ask(&self, message: &str) -> Result<AssistantReply, SupportError> {
        self.chat(message).await
    }

    async fn submit_lead(&self, lead: &LeadRequest) -> Result<(), SupportError> {
        self.lead(lead).await
    }
}

fn unreachable_server(err: reqwest::Error) -> SupportError {
    warn!("Request to server failed: {err}");
    SupportError::Remote(format!("Could not reach the server: {err}"))
}

async fn ensure_success(response: Response) -> Result<Response, SupportError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    warn!("Server responded with {}: {}", status, error_text);
    Err(SupportError::Remote(error_message(&error_text)))
}

/// Picks the most useful text from an error body: `details`, then `error`, then the raw body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) => details,
        Ok(ErrorBody { error, .. }) => error,
        Err(_) if body.trim().is_empty() => "Request failed".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
