//! # SQLite Provider Tests
//!
//! Verifies that `SqliteProvider` serves the knowledge base in insertion order and
//! persists leads, including leads without a name.
//!
//! Most tests use an in-memory database; one uses a temporary file to check that data
//! survives reopening.

mod common;

use crate::common::setup_tracing;
use supportpilot::{
    providers::db::{
        sqlite::SqliteProvider,
        storage::{KnowledgeBase, LeadStore},
    },
    types::{KnowledgeRecord, LeadRecord},
};
use tempfile::NamedTempFile;

async fn memory_provider() -> SqliteProvider {
    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_schema()
        .await
        .expect("Failed to initialize schema");
    provider
}

#[tokio::test]
async fn test_empty_knowledge_base() {
    setup_tracing();
    let provider = memory_provider().await;

    let records = provider.list_records().await.unwrap();
    assert!(records.is_empty());
}

/// Records come back oldest first, and repeated reads agree.
#[tokio::test]
async fn test_records_are_listed_in_insertion_order() {
    setup_tracing();
    let provider = memory_provider().await;
    let inserted = vec![
        KnowledgeRecord::new("What are your hours?", "9am-5pm"),
        KnowledgeRecord::new("Do you ship abroad?", "Only within the EU."),
        KnowledgeRecord::new("Can I return items?", "Within 30 days."),
    ];
    for record in &inserted {
        provider.add_record(record).await.unwrap();
    }

    let first = provider.list_records().await.unwrap();
    let second = provider.list_records().await.unwrap();

    assert_eq!(first, inserted);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_schema_initialization_is_idempotent() {
    setup_tracing();
    let provider = memory_provider().await;
    provider
        .add_record(&KnowledgeRecord::new("Q", "A"))
        .await
        .unwrap();

    provider.initialize_schema().await.unwrap();

    assert_eq!(provider.list_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lead_with_and_without_name() {
    setup_tracing();
    let provider = memory_provider().await;

    provider
        .insert_lead(LeadRecord::from_input(Some("Ana"), "0812345678", "Mars?").unwrap())
        .await
        .unwrap();
    provider
        .insert_lead(LeadRecord::from_input(None, "0899999999", "Venus?").unwrap())
        .await
        .unwrap();

    let leads = provider.list_leads().await.unwrap();
    assert_eq!(leads.len(), 2);
    assert_eq!(leads[0].name.as_deref(), Some("Ana"));
    assert_eq!(leads[0].phone, "0812345678");
    assert_eq!(leads[0].question, "Mars?");
    assert_eq!(leads[1].name, None);
    assert!(!leads[1].created_at.is_empty());
    assert!(leads[0].created_at <= leads[1].created_at);
}

/// A knowledge-base handle and a lead-store handle cloned from one provider share data.
#[tokio::test]
async fn test_clones_share_the_database() {
    setup_tracing();
    let provider = memory_provider().await;
    let kb: Box<dyn KnowledgeBase> = Box::new(provider.clone());
    let leads: Box<dyn LeadStore> = Box::new(provider.clone());

    provider
        .add_record(&KnowledgeRecord::new("Q", "A"))
        .await
        .unwrap();
    leads
        .insert_lead(LeadRecord::from_input(None, "1", "Q").unwrap())
        .await
        .unwrap();

    assert_eq!(kb.list_records().await.unwrap().len(), 1);
    assert_eq!(provider.list_leads().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_database_persists() {
    setup_tracing();
    let db_file = NamedTempFile::new().unwrap();
    let db_path = db_file.path().to_str().unwrap().to_string();

    {
        let provider = SqliteProvider::new(&db_path).await.unwrap();
        provider.initialize_schema().await.unwrap();
        provider
            .add_record(&KnowledgeRecord::new("What are your hours?", "9am-5pm"))
            .await
            .unwrap();
    }

    let reopened = SqliteProvider::new(&db_path).await.unwrap();
    reopened.initialize_schema().await.unwrap();
    let records = reopened.list_records().await.unwrap();
    assert_eq!(
        records,
        vec![KnowledgeRecord::new("What are your hours?", "9am-5pm")]
    );
}
