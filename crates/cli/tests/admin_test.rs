//! # Local Administration Tests

#[path = "../src/admin.rs"]
#[allow(dead_code)]
mod admin;

use supportpilot::{providers::db::storage::LeadStore, types::LeadRecord};
use tempfile::tempdir;

#[tokio::test]
async fn test_add_and_list_knowledge_in_nested_path() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("kb.db");
    let provider = admin::open_database(db_path.to_str().unwrap())
        .await
        .unwrap();

    admin::add_knowledge(&provider, " What are your hours? ", "9am-5pm")
        .await
        .unwrap();
    admin::add_knowledge(&provider, "Where are you?", "Bangkok")
        .await
        .unwrap();

    let records = admin::list_knowledge(&provider).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question, "What are your hours?");
    assert_eq!(
        admin::format_knowledge(&records),
        "1. Q: What are your hours?\n   A: 9am-5pm\n2. Q: Where are you?\n   A: Bangkok"
    );
}

#[tokio::test]
async fn test_blank_fields_are_rejected() {
    let provider = admin::open_database(":memory:").await.unwrap();

    assert!(admin::add_knowledge(&provider, "  ", "answer").await.is_err());
    assert!(admin::add_knowledge(&provider, "question", "").await.is_err());
    assert!(admin::list_knowledge(&provider).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_leads() {
    let provider = admin::open_database(":memory:").await.unwrap();
    assert_eq!(admin::format_leads(&[]), "No leads captured yet.");

    provider
        .insert_lead(LeadRecord {
            name: None,
            phone: "555-0100".to_string(),
            question: "Do you ship to Mars?".to_string(),
        })
        .await
        .unwrap();

    let leads = admin::list_leads(&provider).await.unwrap();
    assert_eq!(leads.len(), 1);
    let rendered = admin::format_leads(&leads);
    assert!(rendered.contains("(anonymous) <555-0100>: Do you ship to Mars?"));
}
