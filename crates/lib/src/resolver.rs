//! # Answer Resolver
//!
//! The single decision point between a grounded answer and the lead-capture handoff.
//! The sentinel literal and every comparison against it are confined to this module.

/// The reserved token the model is instructed to emit when the knowledge base does
/// not contain an answer. It must never reach an end user.
pub const LEAD_TOKEN: &str = "[LEAD_REQUIRED]";

/// The classification of a raw completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A grounded answer, already trimmed.
    Direct(String),
    /// The model signalled that no grounded answer exists.
    Fallback,
}

/// Classifies a raw completion.
///
/// Returns [`Outcome::Fallback`] if and only if the trimmed text equals [`LEAD_TOKEN`]
/// exactly. Anything else, including an empty string, is a direct answer.
pub fn resolve(raw_completion: &str) -> Outcome {
    let trimmed = raw_completion.trim();
    if trimmed == LEAD_TOKEN {
        Outcome::Fallback
    } else {
        Outcome::Direct(trimmed.to_string())
    }
}

/// Removes stray occurrences of the sentinel from a direct answer.
///
/// A completion such as `"Sorry. [LEAD_REQUIRED]"` is not a fallback, but the token
/// still must not be displayed. Removal repeats until no token is left, because
/// removing a nested token can join the text around it into a new one.
pub fn redact_sentinel(answer: &str) -> String {
    if !answer.contains(LEAD_TOKEN) {
        return answer.to_string();
    }
    let mut redacted = answer.replace(LEAD_TOKEN, "");
    while redacted.contains(LEAD_TOKEN) {
        redacted = redacted.replace(LEAD_TOKEN, "");
    }
    redacted.trim().to_string()
}
