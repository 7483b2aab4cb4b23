//! # Prompt Template Modules
//!
//! This module holds the prompt templates and the composer that turns a knowledge
//! base snapshot and a user question into a single grounding prompt.

pub mod grounding;

pub use grounding::{compose, render_knowledge, PromptComposer, DEFAULT_GROUNDING_PROMPT};
