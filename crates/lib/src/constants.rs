//! # Shared Constants
//!
//! Literals shared by the server, the client and the tests. The lead sentinel lives
//! in [`crate::resolver`] together with the only comparison against it.

/// The default path for the application SQLite database.
pub const DEFAULT_DB_FILE: &str = "db/supportpilot.db";

/// Substituted for the knowledge section of a prompt when there are no records.
pub const EMPTY_KNOWLEDGE_PLACEHOLDER: &str = "No knowledge available.";

/// Returned with a 400 when the chat message is blank.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Returned with a 400 when a lead lacks a phone number or question.
pub const LEAD_FIELDS_REQUIRED: &str = "phone and question are required";

/// Shown to the user instead of the sentinel when no grounded answer exists.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "I can't give you a confirmed answer to that. Please share your name and mobile number and we will contact you.";

/// The first assistant turn of every conversation.
pub const DEFAULT_GREETING: &str = "Hi! What would you like to ask SupportPilot?";

/// Appended after a lead was stored successfully.
pub const DEFAULT_THANK_YOU: &str = "Thank you! We will contact you shortly.";

/// The grounding limit used when the configuration does not set one.
pub const DEFAULT_MAX_KNOWLEDGE_RECORDS: usize = 500;
