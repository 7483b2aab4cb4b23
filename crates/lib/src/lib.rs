//! # SupportPilot
//!
//! A support assistant that answers strictly from a knowledge base of question/answer
//! records and hands off to lead capture when no grounded answer exists.
//!
//! The protocol has three parts:
//!
//! 1.  [`prompts`] composes a single prompt holding the whole knowledge base and an
//!     instruction to reply with a reserved sentinel when the answer is not in it.
//! 2.  [`resolver`] classifies the completion as a direct answer or a fallback. The
//!     sentinel never leaves this crate.
//! 3.  [`conversation`] is the client-side state machine that turns a fallback into a
//!     lead-capture form and submits it through [`lead`].
//!
//! [`SupportClient`] wires the server-side parts to an [`providers::ai::AiProvider`]
//! and the storage traits in [`providers::db::storage`].

pub mod client;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod lead;
pub mod prompts;
pub mod providers;
pub mod resolver;
pub mod types;

pub use client::{SupportClient, SupportClientBuilder};
pub use errors::{ErrorKind, SupportError};
pub use types::{AssistantReply, KnowledgeRecord, LeadRecord, ModelInfo, Turn};
