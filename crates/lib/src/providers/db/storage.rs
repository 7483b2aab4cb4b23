use crate::{
    errors::SupportError,
    types::{KnowledgeRecord, LeadRecord},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A read-only source of question/answer records used for grounding.
#[async_trait]
pub trait KnowledgeBase: Send + Sync + DynClone + Debug {
    /// Returns every record, oldest first. The order must be stable between calls.
    async fn list_records(&self) -> Result<Vec<KnowledgeRecord>, SupportError>;
}

dyn_clone::clone_trait_object!(KnowledgeBase);

/// A sink for captured leads.
#[async_trait]
pub trait LeadStore: Send + Sync + DynClone + Debug {
    /// Persists one lead as a single insert. Ownership of the record moves to the store.
    async fn insert_lead(&self, lead: LeadRecord) -> Result<(), SupportError>;
}

dyn_clone::clone_trait_object!(LeadStore);
