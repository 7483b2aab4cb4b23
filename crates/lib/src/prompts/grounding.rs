//! # Grounding Prompt
//!
//! Builds the one prompt sent to the generation provider. The whole knowledge base is
//! placed in context, so the prompt grows linearly with the number of records; the
//! support client enforces an upper bound before composing.

use crate::{
    constants::EMPTY_KNOWLEDGE_PLACEHOLDER, errors::SupportError, resolver::LEAD_TOKEN,
    types::KnowledgeRecord,
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The default grounding prompt.
///
/// Placeholders: `{sentinel}`, `{knowledge}`, `{question}`
pub const DEFAULT_GROUNDING_PROMPT: &str = r#"You are a customer support assistant.
Answer using ONLY the knowledge base below.

If the answer is NOT in the knowledge base, reply with EXACTLY this token and nothing else (no punctuation, no explanation):
{sentinel}

Knowledge base:
{knowledge}

User: {question}"#;

const REQUIRED_PLACEHOLDERS: [&str; 3] = ["{sentinel}", "{knowledge}", "{question}"];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(sentinel|knowledge|question)\}").expect("placeholder pattern is valid")
});

/// Renders records as `Q:`/`A:` blocks separated by a blank line, in the given order.
///
/// An empty list renders the fixed placeholder so the model never sees an empty
/// grounding section.
pub fn render_knowledge(records: &[KnowledgeRecord]) -> String {
    if records.is_empty() {
        return EMPTY_KNOWLEDGE_PLACEHOLDER.to_string();
    }
    records
        .iter()
        .map(|r| format!("Q: {}\nA: {}", r.question, r.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Composes a grounding prompt with the default template.
pub fn compose(records: &[KnowledgeRecord], question: &str) -> String {
    PromptComposer::default().compose(records, question)
}

/// A grounding prompt template with validated placeholders.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    template: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            template: DEFAULT_GROUNDING_PROMPT.to_string(),
        }
    }
}

impl PromptComposer {
    /// Creates a composer from a custom template.
    ///
    /// The template must contain every placeholder; a template without `{sentinel}`
    /// would silently disable the lead-capture handoff.
    pub fn with_template(template: impl Into<String>) -> Result<Self, SupportError> {
        let template = template.into();
        let missing: Vec<&str> = REQUIRED_PLACEHOLDERS
            .iter()
            .copied()
            .filter(|p| !template.contains(p))
            .collect();
        if !missing.is_empty() {
            return Err(SupportError::InvalidPromptTemplate(format!(
                "missing placeholder(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fills the template in a single pass, so text inside the question or the
    /// records is never re-interpreted as a placeholder.
    pub fn compose(&self, records: &[KnowledgeRecord], question: &str) -> String {
        let knowledge = render_knowledge(records);
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "sentinel" => LEAD_TOKEN.to_string(),
                "knowledge" => knowledge.clone(),
                _ => question.to_string(),
            })
            .trim()
            .to_string()
    }
}
