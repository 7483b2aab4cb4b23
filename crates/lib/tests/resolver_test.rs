//! # Answer Resolver Tests

use supportpilot::resolver::{redact_sentinel, resolve, Outcome, LEAD_TOKEN};

#[test]
fn test_exact_sentinel_is_fallback() {
    assert_eq!(resolve("[LEAD_REQUIRED]"), Outcome::Fallback);
}

#[test]
fn test_sentinel_with_surrounding_whitespace_is_fallback() {
    assert_eq!(resolve("  \n[LEAD_REQUIRED]\t\n"), Outcome::Fallback);
}

#[test]
fn test_plain_answer_is_direct_and_trimmed() {
    assert_eq!(
        resolve("  We are open 9am-5pm.\n"),
        Outcome::Direct("We are open 9am-5pm.".to_string())
    );
}

/// Only an exact match triggers the handoff.
#[test]
fn test_sentinel_inside_text_is_not_fallback() {
    for raw in [
        "Sorry, [LEAD_REQUIRED]",
        "[LEAD_REQUIRED].",
        "`[LEAD_REQUIRED]`",
        "[lead_required]",
        "[LEAD_REQUIRED] [LEAD_REQUIRED]",
    ] {
        assert!(
            matches!(resolve(raw), Outcome::Direct(_)),
            "'{raw}' should not be a fallback"
        );
    }
}

#[test]
fn test_empty_completion_is_direct_empty() {
    assert_eq!(resolve(""), Outcome::Direct(String::new()));
    assert_eq!(resolve("   "), Outcome::Direct(String::new()));
}

#[test]
fn test_redacted_direct_answer_never_shows_token() {
    let Outcome::Direct(answer) = resolve("Call us. [LEAD_REQUIRED]") else {
        panic!("expected a direct answer");
    };
    let shown = redact_sentinel(&answer);
    assert_eq!(shown, "Call us.");
    assert!(!shown.contains(LEAD_TOKEN));
}

/// A nested token is not the sentinel, and removing the inner one must not leave a
/// whole sentinel behind.
#[test]
fn test_nested_token_is_direct_and_fully_redacted() {
    let raw = "[LEAD_[LEAD_REQUIRED]REQUIRED]";
    let Outcome::Direct(answer) = resolve(raw) else {
        panic!("expected a direct answer");
    };

    let shown = redact_sentinel(&answer);

    assert!(!shown.contains(LEAD_TOKEN), "sentinel leaked: {shown}");
    assert_eq!(shown, "");
}
