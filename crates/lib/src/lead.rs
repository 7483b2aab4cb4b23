//! # Lead Intake
//!
//! Validates contact details collected after a fallback and forwards them to a
//! [`LeadStore`].

use crate::{
    constants::LEAD_FIELDS_REQUIRED, errors::SupportError,
    providers::db::storage::LeadStore, types::LeadRecord,
};
use tracing::{error, info};

/// Acknowledges a stored lead. Carries no identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadAck;

impl LeadRecord {
    /// Normalizes raw form input into a record.
    ///
    /// `phone` and `question` are trimmed and must be non-empty. A blank `name` becomes `None`.
    pub fn from_input(
        name: Option<&str>,
        phone: &str,
        question: &str,
    ) -> Result<Self, SupportError> {
        let phone = phone.trim();
        let question = question.trim();
        if phone.is_empty() || question.is_empty() {
            return Err(SupportError::Validation(LEAD_FIELDS_REQUIRED.to_string()));
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        Ok(Self {
            name,
            phone: phone.to_string(),
            question: question.to_string(),
        })
    }
}

/// Validates a lead and stores it with a single insert.
///
/// Nothing reaches the store when validation fails.
pub async fn submit_lead(
    store: &dyn LeadStore,
    name: Option<&str>,
    phone: &str,
    question: &str,
) -> Result<LeadAck, SupportError> {
    let record = LeadRecord::from_input(name, phone, question)?;
    info!(has_name = record.name.is_some(), "Submitting lead.");

    store.insert_lead(record).await.map_err(|e| {
        error!("Failed to store lead: {e}");
        e
    })?;

    Ok(LeadAck)
}
