//! Free-text answer checking for riddle stops.
//!
//! Matching is case-insensitive, synonym-aware and substring-tolerant. The
//! stages run from strictest to most permissive and stop at the first hit.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod sanitize;
pub mod synonyms;

pub use sanitize::{is_safe_input, normalize, sanitize_input, MAX_ANSWER_LENGTH};
pub use synonyms::SynonymTable;

/// Which stage accepted an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMatch {
    /// Equal after normalization
    Exact,
    /// Equal to a listed alternative
    Synonym,
    /// One contains the other
    Substring,
    /// Contains, or is contained in, a listed alternative
    SynonymSubstring,
}

/// Decide whether `user_answer` matches `correct_answer`.
pub fn validate_answer(user_answer: &str, correct_answer: &str, synonyms: &SynonymTable) -> bool {
    match_answer(user_answer, correct_answer, synonyms).is_some()
}

/// Like [`validate_answer`], reporting the stage that accepted the answer.
pub fn match_answer(
    user_answer: &str,
    correct_answer: &str,
    synonyms: &SynonymTable,
) -> Option<AnswerMatch> {
    if user_answer.trim().is_empty() || correct_answer.trim().is_empty() {
        return None;
    }

    // Screen the raw text as well as the cleaned text: stripping brackets
    // would otherwise turn "<script>" into an innocent-looking word.
    if !is_safe_input(user_answer) {
        debug!("Rejected unsafe answer input");
        return None;
    }
    let sanitized = sanitize_input(user_answer);
    if !is_safe_input(&sanitized) {
        debug!("Rejected answer input that is empty after sanitizing");
        return None;
    }

    let user = normalize(&sanitized);
    let correct = normalize(correct_answer);

    if user == correct {
        return Some(AnswerMatch::Exact);
    }

    let alternatives = synonyms.synonyms_for(&correct);
    if alternatives.iter().any(|s| *s == user) {
        return Some(AnswerMatch::Synonym);
    }

    if user.contains(&correct) || correct.contains(&user) {
        return Some(AnswerMatch::Substring);
    }

    if alternatives
        .iter()
        .any(|s| user.contains(s.as_str()) || s.contains(&user))
    {
        return Some(AnswerMatch::SynonymSubstring);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(user: &str, correct: &str) -> bool {
        validate_answer(user, correct, &SynonymTable::builtin())
    }

    fn stage(user: &str, correct: &str) -> Option<AnswerMatch> {
        match_answer(user, correct, &SynonymTable::builtin())
    }

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        assert_eq!(stage("  Brooklyn BRIDGE ", "brooklyn bridge"), Some(AnswerMatch::Exact));
        assert_eq!(stage("brooklyn bridge", "Brooklyn Bridge "), Some(AnswerMatch::Exact));
    }

    #[test]
    fn test_substring_match() {
        assert!(check("Empire State", "empire state building"));
        assert!(check("it's the brooklyn bridge!", "Brooklyn Bridge"));
    }

    #[test]
    fn test_synonym_match() {
        assert!(check("esb", "empire state building"));
        assert_eq!(stage("ESB", "Empire State Building"), Some(AnswerMatch::Synonym));
        assert_eq!(stage("7", "seven"), Some(AnswerMatch::Synonym));
    }

    #[test]
    fn test_synonym_preferred_over_substring() {
        // "empire state" is both a listed synonym and a substring
        assert_eq!(stage("empire state", "empire state building"), Some(AnswerMatch::Synonym));
    }

    #[test]
    fn test_synonym_substring_match() {
        assert_eq!(
            stage("I think it's the freedom tower", "one world trade center"),
            Some(AnswerMatch::SynonymSubstring)
        );
        assert_eq!(stage("chrys", "chrysler building"), Some(AnswerMatch::Substring));
        assert_eq!(stage("flat", "flatiron building"), Some(AnswerMatch::Substring));
        assert_eq!(stage("1 wt", "one world trade center"), Some(AnswerMatch::SynonymSubstring));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert!(!check("", "anything"));
        assert!(!check("   ", "anything"));
        assert!(!check("anything", ""));
    }

    #[test]
    fn test_unsafe_input_is_rejected_before_matching() {
        assert!(!check("<script>x</script>", "x"));
        assert!(!check("javascript:x", "x"));
        assert!(!check("x onmouseover=y", "x"));
    }

    #[test]
    fn test_input_empty_after_sanitizing_is_rejected() {
        assert!(!check("<>", "anything"));
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let long = format!("times square {}", "a".repeat(MAX_ANSWER_LENGTH));
        assert!(!check(&long, "times square"));
    }

    #[test]
    fn test_wrong_answers() {
        assert!(!check("statue of liberty", "empire state building"));
        assert!(!check("bridge tunnel", "central park"));
    }

    #[test]
    fn test_single_character_answer_is_permissive() {
        // A one-character canonical answer matches anything containing it.
        assert_eq!(stage("forty two", "o"), Some(AnswerMatch::Substring));
        assert!(!check("xyz", "o"));
    }

    #[test]
    fn test_works_with_empty_table() {
        let table = SynonymTable::new();
        assert!(validate_answer("Empire State", "empire state building", &table));
        assert!(!validate_answer("esb", "empire state building", &table));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let table = SynonymTable::builtin();
        let first = match_answer("lady liberty", "Statue of Liberty", &table);
        let second = match_answer("lady liberty", "Statue of Liberty", &table);
        assert_eq!(first, second);
        assert_eq!(first, Some(AnswerMatch::Synonym));
    }
}
