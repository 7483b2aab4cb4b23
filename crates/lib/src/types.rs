use serde::{Deserialize, Serialize};

/// A single question/answer pair from the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub question: String,
    pub answer: String,
}

impl KnowledgeRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A validated contact request, ready to be handed to a [`crate::providers::db::storage::LeadStore`].
///
/// Construct it through [`LeadRecord::from_input`] so the required-field checks are
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: Option<String>,
    pub phone: String,
    pub question: String,
}

/// A lead as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLead {
    pub name: Option<String>,
    pub phone: String,
    pub question: String,
    pub created_at: String,
}

/// The answer to one chat message, as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub reply: String,
    pub needs_lead: bool,
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A model exposed by the generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// The provider's full name, e.g. `models/gemini-flash-latest`.
    pub name: String,
    /// The name usable in a generation URL, without the `models/` prefix.
    pub sdk_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn from_name(name: impl Into<String>, methods: Vec<String>) -> Self {
        let name = name.into();
        let sdk_name = name.strip_prefix("models/").unwrap_or(&name).to_string();
        Self {
            name,
            sdk_name,
            supported_generation_methods: methods,
        }
    }
}
