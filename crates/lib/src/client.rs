use crate::{
    constants::{DEFAULT_FALLBACK_REPLY, DEFAULT_MAX_KNOWLEDGE_RECORDS, MESSAGE_REQUIRED},
    errors::SupportError,
    lead::{self, LeadAck},
    prompts::PromptComposer,
    providers::{
        ai::{complete, AiProvider},
        db::storage::{KnowledgeBase, LeadStore},
    },
    resolver::{redact_sentinel, resolve, Outcome},
    types::{AssistantReply, ModelInfo},
};
use std::fmt;
use tracing::{info, warn};

/// The server-side support assistant.
///
/// Holds no per-conversation state, so one instance can serve any number of
/// concurrent requests.
pub struct SupportClient {
    pub(crate) ai_provider: Option<Box<dyn AiProvider>>,
    pub(crate) knowledge_base: Box<dyn KnowledgeBase>,
    pub(crate) lead_store: Box<dyn LeadStore>,
    pub(crate) composer: PromptComposer,
    pub(crate) fallback_reply: String,
    pub(crate) max_records: Option<usize>,
}

impl fmt::Debug for SupportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupportClient")
            .field("ai_provider", &self.ai_provider)
            .field("max_records", &self.max_records)
            .finish_non_exhaustive()
    }
}

impl SupportClient {
    /// Answers one user message from the knowledge base.
    ///
    /// The message is validated before any collaborator is contacted. When the model
    /// emits the sentinel, the configured fallback reply is returned with
    /// `needs_lead = true`; the sentinel itself never appears in a reply.
    pub async fn answer(&self, message: &str) -> Result<AssistantReply, SupportError> {
        let question = message.trim();
        if question.is_empty() {
            return Err(SupportError::Validation(MESSAGE_REQUIRED.to_string()));
        }

        let provider = self.ai_provider.as_deref().ok_or_else(|| {
            SupportError::MissingAiProvider("no API key configured for the AI provider".to_string())
        })?;

        let records = self.knowledge_base.list_records().await?;
        if let Some(limit) = self.max_records {
            if records.len() > limit {
                return Err(SupportError::KnowledgeBaseTooLarge {
                    records: records.len(),
                    limit,
                });
            }
        }
        info!(
            "[answer] Grounding question against {} knowledge records.",
            records.len()
        );

        let prompt = self.composer.compose(&records, question);
        let raw = complete(provider, &prompt).await?;

        Ok(match resolve(&raw) {
            Outcome::Direct(answer) => AssistantReply {
                reply: redact_sentinel(&answer),
                needs_lead: false,
            },
            Outcome::Fallback => {
                info!("[answer] No grounded answer; requesting contact details.");
                AssistantReply {
                    reply: self.fallback_reply.clone(),
                    needs_lead: true,
                }
            }
        })
    }

    /// Validates and stores a lead.
    pub async fn submit_lead(
        &self,
        name: Option<&str>,
        phone: &str,
        question: &str,
    ) -> Result<LeadAck, SupportError> {
        lead::submit_lead(self.lead_store.as_ref(), name, phone, question).await
    }

    /// Lists the models available from the configured provider.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, SupportError> {
        let provider = self.ai_provider.as_deref().ok_or_else(|| {
            SupportError::MissingAiProvider("no API key configured for the AI provider".to_string())
        })?;
        provider.list_models().await
    }

    /// `true` when an AI provider is configured.
    pub fn has_ai_provider(&self) -> bool {
        self.ai_provider.is_some()
    }
}

/// A builder for creating `SupportClient` instances.
///
/// The AI provider is optional: without one, the client still accepts leads and
/// reports a configuration error for questions.
pub struct SupportClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    knowledge_base: Option<Box<dyn KnowledgeBase>>,
    lead_store: Option<Box<dyn LeadStore>>,
    composer: PromptComposer,
    fallback_reply: String,
    max_records: Option<usize>,
}

impl Default for SupportClientBuilder {
    fn default() -> Self {
        Self {
            ai_provider: None,
            knowledge_base: None,
            lead_store: None,
            composer: PromptComposer::default(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            max_records: Some(DEFAULT_MAX_KNOWLEDGE_RECORDS),
        }
    }
}

impl SupportClientBuilder {
    /// Creates a new `SupportClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use supportpilot::SupportClientBuilder;
    ///
    /// let builder = SupportClientBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the knowledge base.
    pub fn knowledge_base(mut self, knowledge_base: Box<dyn KnowledgeBase>) -> Self {
        self.knowledge_base = Some(knowledge_base);
        self
    }

    /// Sets the lead store.
    pub fn lead_store(mut self, lead_store: Box<dyn LeadStore>) -> Self {
        self.lead_store = Some(lead_store);
        self
    }

    pub fn prompt_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    /// Sets the largest knowledge base that may be placed in a prompt. `None` disables the guard.
    pub fn max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    /// Builds the `SupportClient`.
    ///
    /// Fails if the knowledge base or the lead store is missing.
    pub fn build(self) -> Result<SupportClient, SupportError> {
        let knowledge_base = self
            .knowledge_base
            .ok_or(SupportError::MissingStorageProvider)?;
        let lead_store = self.lead_store.ok_or(SupportError::MissingStorageProvider)?;
        if self.ai_provider.is_none() {
            warn!("SupportClient built without an AI provider; questions will fail until one is configured.");
        }

        Ok(SupportClient {
            ai_provider: self.ai_provider,
            knowledge_base,
            lead_store,
            composer: self.composer,
            fallback_reply: self.fallback_reply,
            max_records: self.max_records,
        })
    }
}
