//! # Lead Intake Tests
//!
//! Verifies required-field validation and normalization before a lead reaches storage.

mod common;

use crate::common::{setup_tracing, InMemoryLeadStore};
use supportpilot::{
    constants::LEAD_FIELDS_REQUIRED,
    errors::{ErrorKind, SupportError},
    lead::{submit_lead, LeadAck},
    types::LeadRecord,
};

#[tokio::test]
async fn test_valid_lead_is_stored_trimmed() {
    setup_tracing();
    let store = InMemoryLeadStore::default();

    let ack = submit_lead(&store, Some("  Ana "), " 0812345678 ", " Do you ship to Mars? ")
        .await
        .unwrap();

    assert_eq!(ack, LeadAck);
    assert_eq!(
        store.leads(),
        vec![LeadRecord {
            name: Some("Ana".to_string()),
            phone: "0812345678".to_string(),
            question: "Do you ship to Mars?".to_string(),
        }]
    );
}

/// A missing or blank name is stored as absent.
#[tokio::test]
async fn test_blank_name_is_normalized_to_none() {
    setup_tracing();
    let store = InMemoryLeadStore::default();

    submit_lead(&store, None, "0812345678", "Q1").await.unwrap();
    submit_lead(&store, Some("   "), "0812345678", "Q2").await.unwrap();

    let leads = store.leads();
    assert_eq!(leads.len(), 2);
    assert!(leads.iter().all(|l| l.name.is_none()));
}

#[tokio::test]
async fn test_missing_phone_is_rejected_and_not_stored() {
    setup_tracing();
    let store = InMemoryLeadStore::default();

    for phone in ["", "   "] {
        let err = submit_lead(&store, Some("Ana"), phone, "Do you ship to Mars?")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), LEAD_FIELDS_REQUIRED);
    }
    assert!(store.leads().is_empty());
}

#[tokio::test]
async fn test_missing_question_is_rejected_and_not_stored() {
    setup_tracing();
    let store = InMemoryLeadStore::default();

    let err = submit_lead(&store, None, "0812345678", " ").await.unwrap_err();

    assert!(matches!(err, SupportError::Validation(_)));
    assert!(store.leads().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_a_collaborator_error() {
    setup_tracing();
    let store = InMemoryLeadStore::default();
    store.fail_with("disk full");

    let err = submit_lead(&store, None, "0812345678", "Q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_from_input_validation() {
    assert!(LeadRecord::from_input(Some("Ana"), "", "Q").is_err());
    let record = LeadRecord::from_input(Some(""), "1", "Q").unwrap();
    assert_eq!(record.name, None);
}
