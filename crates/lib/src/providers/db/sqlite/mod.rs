use crate::{
    errors::SupportError,
    providers::db::storage::{KnowledgeBase, LeadStore},
    types::{KnowledgeRecord, LeadRecord, StoredLead},
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{Database, Value as TursoValue};

pub mod sql;

/// A provider for interacting with a local SQLite database using Turso.
///
/// This provider holds a `Database` instance. When cloned, it shares the same
/// underlying database, so a knowledge-base handle and a lead-store handle cloned
/// from one provider see the same data.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// # Arguments
    ///
    /// * `db_path`: The path to the SQLite database file. Use ":memory:" for a unique,
    ///   isolated in-memory database. To share an in-memory database, create one
    ///   provider and then `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, SupportError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| SupportError::StorageConnection(e.to_string()))?;

        // WAL has no effect on in-memory databases but is safe to run.
        let conn = db
            .connect()
            .map_err(|e| SupportError::StorageConnection(e.to_string()))?;
        // Use `query` for PRAGMA statements that return a value to avoid "unexpected row" errors.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| SupportError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    fn connect(&self) -> Result<turso::Connection, SupportError> {
        self.db
            .connect()
            .map_err(|e| SupportError::StorageConnection(e.to_string()))
    }

    /// Ensures that all required application tables exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), SupportError> {
        let conn = self.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Appends a question/answer pair to the knowledge base.
    pub async fn add_record(&self, record: &KnowledgeRecord) -> Result<(), SupportError> {
        let conn = self.connect()?;
        conn.execute(
            sql::INSERT_FAQ_SQL,
            vec![
                TursoValue::Text(record.question.clone()),
                TursoValue::Text(record.answer.clone()),
                TursoValue::Text(now_timestamp()),
            ],
        )
        .await
        .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?;
        info!(question = %record.question, "Added knowledge record.");
        Ok(())
    }

    /// Returns every captured lead, oldest first.
    pub async fn list_leads(&self) -> Result<Vec<StoredLead>, SupportError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(sql::LIST_LEADS_SQL, ())
            .await
            .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?;

        let mut leads = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?
        {
            let name = match row.get_value(0)? {
                TursoValue::Text(s) => Some(s),
                _ => None,
            };
            leads.push(StoredLead {
                name,
                phone: text_value(row.get_value(1)?),
                question: text_value(row.get_value(2)?),
                created_at: text_value(row.get_value(3)?),
            });
        }
        Ok(leads)
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn text_value(v: TursoValue) -> String {
    match v {
        TursoValue::Text(s) => s,
        TursoValue::Integer(i) => i.to_string(),
        TursoValue::Real(f) => f.to_string(),
        TursoValue::Null | TursoValue::Blob(_) => String::new(),
    }
}

#[async_trait]
impl KnowledgeBase for SqliteProvider {
    async fn list_records(&self) -> Result<Vec<KnowledgeRecord>, SupportError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(sql::LIST_FAQS_SQL, ())
            .await
            .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?
        {
            records.push(KnowledgeRecord {
                question: text_value(row.get_value(0)?),
                answer: text_value(row.get_value(1)?),
            });
        }
        debug!("Loaded {} knowledge records.", records.len());
        Ok(records)
    }
}

#[async_trait]
impl LeadStore for SqliteProvider {
    async fn insert_lead(&self, lead: LeadRecord) -> Result<(), SupportError> {
        let conn = self.connect()?;
        let name = match lead.name {
            Some(name) => TursoValue::Text(name),
            None => TursoValue::Null,
        };
        conn.execute(
            sql::INSERT_LEAD_SQL,
            vec![
                name,
                TursoValue::Text(lead.phone),
                TursoValue::Text(lead.question),
                TursoValue::Text(now_timestamp()),
            ],
        )
        .await
        .map_err(|e| SupportError::StorageOperationFailed(e.to_string()))?;
        info!("Stored new lead.");
        Ok(())
    }
}
