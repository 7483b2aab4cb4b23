//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the SQLite provider.
//! This makes the core logic cleaner and isolates database-specific syntax.

/// The knowledge base. `created_at` is an RFC 3339 UTC timestamp, so text ordering
/// is chronological.
pub const CREATE_FAQS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS faqs (
        id INTEGER PRIMARY KEY,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// Captured contact requests awaiting manual follow-up.
pub const CREATE_LEADS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS leads (
        id INTEGER PRIMARY KEY,
        name TEXT,
        phone TEXT NOT NULL,
        question TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// Every statement needed to bring an empty database up to date.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[CREATE_FAQS_TABLE_SQL, CREATE_LEADS_TABLE_SQL];

/// Oldest first; `id` breaks ties between records created in the same instant.
pub const LIST_FAQS_SQL: &str =
    "SELECT question, answer FROM faqs ORDER BY created_at ASC, id ASC";

pub const INSERT_FAQ_SQL: &str =
    "INSERT INTO faqs (question, answer, created_at) VALUES (?, ?, ?)";

pub const INSERT_LEAD_SQL: &str =
    "INSERT INTO leads (name, phone, question, created_at) VALUES (?, ?, ?, ?)";

pub const LIST_LEADS_SQL: &str =
    "SELECT name, phone, question, created_at FROM leads ORDER BY created_at ASC, id ASC";
