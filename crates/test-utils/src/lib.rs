use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use supportpilot::errors::SupportError;
use supportpilot::providers::ai::AiProvider;
use supportpilot::providers::db::sqlite::SqliteProvider;
use supportpilot::providers::db::storage::{KnowledgeBase, LeadStore};
use supportpilot::types::{KnowledgeRecord, LeadRecord, ModelInfo};

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub provider: SqliteProvider,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let provider = SqliteProvider::new(":memory:").await?;
        provider.initialize_schema().await?;
        Ok(Self { provider })
    }

    /// Creates a database pre-filled with question/answer pairs, in the given order.
    pub async fn with_records(records: &[(&str, &str)]) -> Result<Self> {
        let setup = Self::new().await?;
        seed_knowledge(&setup.provider, records).await?;
        Ok(setup)
    }
}

/// Appends question/answer pairs to an initialized database.
pub async fn seed_knowledge(provider: &SqliteProvider, records: &[(&str, &str)]) -> Result<()> {
    for (question, answer) in records {
        provider
            .add_record(&KnowledgeRecord::new(*question, *answer))
            .await?;
    }
    Ok(())
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    /// Checked in insertion order; the first key found in the prompt wins.
    responses: Arc<Mutex<Vec<(String, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key is a substring of the prompt, such as its `User:` line. When several
    /// keys match, the one added first is used. Re-adding a key replaces its response.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        match responses.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = response.to_string(),
            None => responses.push((key.to_string(), response.to_string())),
        }
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, SupportError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(SupportError::AiApi(format!(
            "MockAiProvider: No response programmed for prompt. Got: '{prompt}'"
        )))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, SupportError> {
        Ok(vec![ModelInfo::from_name(
            "models/mock-chat-model",
            vec!["generateContent".to_string()],
        )])
    }
}

// --- Failing Storage ---

/// A knowledge base and lead store whose every operation fails with the given message.
#[derive(Clone, Debug)]
pub struct FailingStorage {
    message: String,
}

impl FailingStorage {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl KnowledgeBase for FailingStorage {
    async fn list_records(&self) -> Result<Vec<KnowledgeRecord>, SupportError> {
        Err(SupportError::StorageOperationFailed(self.message.clone()))
    }
}

#[async_trait]
impl LeadStore for FailingStorage {
    async fn insert_lead(&self, _lead: LeadRecord) -> Result<(), SupportError> {
        Err(SupportError::StorageOperationFailed(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_prefers_first_matching_key() {
        let ai = MockAiProvider::new();
        ai.add_response("User:", "generic");
        ai.add_response("User: What are your hours?", "specific");

        for _ in 0..10 {
            let reply = ai.generate("User: What are your hours?").await.unwrap();
            assert_eq!(reply, "generic");
        }
    }

    #[tokio::test]
    async fn mock_readding_key_replaces_response() {
        let ai = MockAiProvider::new();
        ai.add_response("hours", "old");
        ai.add_response("hours", "new");

        assert_eq!(ai.generate("hours?").await.unwrap(), "new");
        assert_eq!(ai.get_calls().len(), 1);
    }

    #[tokio::test]
    async fn failing_storage_fails_both_seams() {
        let storage = FailingStorage::new("disk on fire");

        let read = storage.list_records().await.unwrap_err();
        let write = storage
            .insert_lead(LeadRecord::from_input(None, "555", "Q").unwrap())
            .await
            .unwrap_err();

        assert!(read.to_string().contains("disk on fire"));
        assert!(write.to_string().contains("disk on fire"));
    }
}
