//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the SQLite provider and the
//! `SupportClient`, making them accessible to all request handlers.

use crate::config::{AppConfig, ProviderConfig};
use std::sync::Arc;
use supportpilot::{
    prompts::PromptComposer,
    providers::{
        ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
        db::sqlite::SqliteProvider,
    },
    SupportClient, SupportClientBuilder,
};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The database holding the knowledge base and the captured leads.
    pub sqlite_provider: Arc<SqliteProvider>,
    /// Answers questions and accepts leads. Holds no per-conversation state.
    pub support_client: Arc<SupportClient>,
}

/// Instantiates the generation provider described by the configuration.
///
/// Returns `Ok(None)` when the Gemini provider has no API key: the server still
/// starts and accepts leads, and questions fail with a configuration error.
pub fn build_ai_provider(config: &ProviderConfig) -> anyhow::Result<Option<Box<dyn AiProvider>>> {
    match config.provider.as_str() {
        "gemini" => {
            let Some(api_key) = config.api_key.clone() else {
                warn!("No API key configured for the gemini provider; /chat and /models are disabled.");
                return Ok(None);
            };
            Ok(Some(Box::new(GeminiProvider::new(
                config.resolved_api_url(),
                api_key,
                config.resolved_model_name(),
            )?)))
        }
        "local" => {
            // For local providers, the URL is always required.
            let api_url = config.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("api_url is required for the local provider")
            })?;
            Ok(Some(Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                config.model_name.clone(),
            )?)))
        }
        other => Err(anyhow::anyhow!("Unsupported AI provider type '{other}'")),
    }
}

/// Builds the shared application state from the configuration.
///
/// This opens the SQLite database, brings its schema up to date and creates the
/// AI provider.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if let Some(parent) = std::path::Path::new(&config.db_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    sqlite_provider.initialize_schema().await?;

    let ai_provider = build_ai_provider(&config.provider)?;
    assemble_app_state(config, sqlite_provider, ai_provider)
}

/// Wires an already opened database and an optional AI provider into an `AppState`.
pub fn assemble_app_state(
    config: AppConfig,
    sqlite_provider: SqliteProvider,
    ai_provider: Option<Box<dyn AiProvider>>,
) -> anyhow::Result<AppState> {
    let composer = match &config.grounding.prompt_template {
        Some(template) => PromptComposer::with_template(template.clone())?,
        None => PromptComposer::default(),
    };

    let mut builder = SupportClientBuilder::new()
        .knowledge_base(Box::new(sqlite_provider.clone()))
        .lead_store(Box::new(sqlite_provider.clone()))
        .prompt_composer(composer)
        .fallback_reply(config.messages.fallback_reply)
        .max_records(config.grounding.record_limit());
    if let Some(provider) = ai_provider {
        builder = builder.ai_provider(provider);
    }
    let support_client = builder.build()?;

    Ok(AppState {
        sqlite_provider: Arc::new(sqlite_provider),
        support_client: Arc::new(support_client),
    })
}
