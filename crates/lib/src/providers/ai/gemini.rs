use crate::{errors::SupportError, providers::ai::AiProvider, types::ModelInfo};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::info;

/// The public Gemini REST base URL.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    #[serde(default)]
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    ///
    /// `api_url` is the REST base (e.g. [`GEMINI_API_URL`]); the generation and model
    /// listing paths are derived from it.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, SupportError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(SupportError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, SupportError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(SupportError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SupportError::AiApi(error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(SupportError::AiDeserialization)?;

        // An explicitly empty text part is a valid (empty) answer; no text part at all is not.
        let parts = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| {
                SupportError::AiMalformedResponse("response contained no candidate text".to_string())
            })?;

        Ok(parts.into_iter().map(|p| p.text).collect())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, SupportError> {
        let url = format!("{}/models", self.api_url);
        info!("Listing Gemini models from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(SupportError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SupportError::AiApi(error_text));
        }

        let listing: ModelListResponse = response
            .json()
            .await
            .map_err(SupportError::AiDeserialization)?;

        Ok(listing
            .models
            .into_iter()
            .map(|m| ModelInfo::from_name(m.name, m.supported_generation_methods))
            .collect())
    }
}
