pub mod gemini;
pub mod local;

use crate::{errors::SupportError, types::ModelInfo};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use tracing::debug;

/// A trait for interacting with a text-generation provider.
///
/// Implementations send one prompt and return one completion. They must not retry:
/// a duplicate call may cost money and return a different answer.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a completion for a fully composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String, SupportError>;

    /// Lists the models available to the configured credential.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, SupportError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Sends a prompt to the provider and returns its output trimmed of surrounding whitespace.
pub async fn complete(provider: &dyn AiProvider, prompt: &str) -> Result<String, SupportError> {
    debug!(prompt_len = prompt.len(), "--> Sending prompt to AI provider");
    let raw = provider.generate(prompt).await?;
    debug!("<-- Completion from AI: {}", raw);
    Ok(raw.trim().to_string())
}
