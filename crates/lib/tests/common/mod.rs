//! # Common Test Utilities
//!
//! In-memory collaborators for the library tests: a scripted AI provider and
//! knowledge-base and lead stores backed by shared vectors.

#![allow(unused)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex, Once};
use supportpilot::{
    errors::SupportError,
    providers::{
        ai::AiProvider,
        db::storage::{KnowledgeBase, LeadStore},
    },
    types::{KnowledgeRecord, LeadRecord, ModelInfo},
};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// --- Mock AI Provider ---

/// Answers with the response whose key appears in the prompt's `User:` line,
/// or with the default response.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    default_response: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, question: &str, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push((question.to_string(), response.to_string()));
    }

    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = Some(response.to_string());
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, SupportError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SupportError::AiApi(message));
        }
        let user_line = prompt
            .lines()
            .rev()
            .find(|l| l.starts_with("User: "))
            .unwrap_or_default();
        for (key, response) in self.responses.lock().unwrap().iter() {
            if user_line.contains(key.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self
            .default_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, SupportError> {
        Ok(vec![ModelInfo::from_name(
            "models/mock-model",
            vec!["generateContent".to_string()],
        )])
    }
}

// --- In-memory stores ---

#[derive(Clone, Debug, Default)]
pub struct InMemoryKnowledgeBase {
    records: Arc<Mutex<Vec<KnowledgeRecord>>>,
    reads: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryKnowledgeBase {
    pub fn with_records(records: &[(&str, &str)]) -> Self {
        let kb = Self::default();
        *kb.records.lock().unwrap() = records
            .iter()
            .map(|(q, a)| KnowledgeRecord::new(*q, *a))
            .collect();
        kb
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    async fn list_records(&self) -> Result<Vec<KnowledgeRecord>, SupportError> {
        *self.reads.lock().unwrap() += 1;
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SupportError::StorageOperationFailed(message));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryLeadStore {
    leads: Arc<Mutex<Vec<LeadRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryLeadStore {
    pub fn leads(&self) -> Vec<LeadRecord> {
        self.leads.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert_lead(&self, lead: LeadRecord) -> Result<(), SupportError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SupportError::StorageOperationFailed(message));
        }
        self.leads.lock().unwrap().push(lead);
        Ok(())
    }
}
