//! # Local Administration
//!
//! Knowledge-base and lead maintenance performed directly on the SQLite file the
//! server reads from. These commands do not need the server to be running.

use anyhow::{bail, Result};
use std::path::Path;
use supportpilot::{
    providers::db::{sqlite::SqliteProvider, storage::KnowledgeBase},
    types::{KnowledgeRecord, StoredLead},
};
use tracing::info;

/// Opens the database at `db_path`, creating its parent directory and the schema if needed.
pub async fn open_database(db_path: &str) -> Result<SqliteProvider> {
    if db_path != ":memory:" {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let provider = SqliteProvider::new(db_path).await?;
    provider.initialize_schema().await?;
    info!("Local database '{}' is ready.", db_path);
    Ok(provider)
}

/// Appends one question/answer pair. Both fields must be non-blank.
pub async fn add_knowledge(
    provider: &SqliteProvider,
    question: &str,
    answer: &str,
) -> Result<KnowledgeRecord> {
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        bail!("Both a question and an answer are required.");
    }
    let record = KnowledgeRecord::new(question, answer);
    provider.add_record(&record).await?;
    Ok(record)
}

pub async fn list_knowledge(provider: &SqliteProvider) -> Result<Vec<KnowledgeRecord>> {
    Ok(provider.list_records().await?)
}

pub async fn list_leads(provider: &SqliteProvider) -> Result<Vec<StoredLead>> {
    Ok(provider.list_leads().await?)
}

/// Renders records as numbered `Q:`/`A:` blocks.
pub fn format_knowledge(records: &[KnowledgeRecord]) -> String {
    if records.is_empty() {
        return "The knowledge base is empty.".to_string();
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. Q: {}\n   A: {}", i + 1, r.question, r.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one line per lead.
pub fn format_leads(leads: &[StoredLead]) -> String {
    if leads.is_empty() {
        return "No leads captured yet.".to_string();
    }
    leads
        .iter()
        .map(|lead| {
            format!(
                "[{}] {} <{}>: {}",
                lead.created_at,
                lead.name.as_deref().unwrap_or("(anonymous)"),
                lead.phone,
                lead.question
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
