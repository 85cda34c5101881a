//! Basic safety screening and cleanup of free-text answers.

use regex::Regex;
use std::sync::OnceLock;

/// Longest answer accepted, in characters.
pub const MAX_ANSWER_LENGTH: usize = 500;

fn denylist() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)<\s*/?\s*script",
            r"(?i)javascript\s*:",
            r"(?i)vbscript\s*:",
            r"(?i)data\s*:\s*text/html",
            r"(?i)\bon[a-z]+\s*=",
            r"(?i)<\s*(iframe|object|embed)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("denylist pattern is valid"))
        .collect()
    })
}

fn javascript_scheme() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)javascript\s*:").expect("scheme pattern is valid"))
}

fn event_handler() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bon[a-z]+\s*=").expect("handler pattern is valid"))
}

/// True if the input is non-blank, at most [`MAX_ANSWER_LENGTH`] characters
/// after trimming, and free of script-injection patterns.
pub fn is_safe_input(input: &str) -> bool {
    let trimmed = input.trim();
    let length = trimmed.chars().count();
    if length == 0 || length > MAX_ANSWER_LENGTH {
        return false;
    }
    !denylist().iter().any(|re| re.is_match(trimmed))
}

/// Strip angle brackets, `javascript:` and inline event handlers, then trim.
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let without_scheme = javascript_scheme().replace_all(&without_brackets, "");
    let without_handlers = event_handler().replace_all(&without_scheme, "");
    without_handlers.trim().to_string()
}

/// Lowercase and trim for comparison.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
