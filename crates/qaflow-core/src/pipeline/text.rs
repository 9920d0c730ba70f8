//! Answer text cleanup and validity checks.

use qaflow_types::{InvalidAnswers, Language};

/// Strip surrounding whitespace from a model answer.
pub fn clean_answer(raw: &str) -> &str {
    raw.trim()
}

/// An answer is usable unless it is empty or one of the configured
/// "unknown" markers for `language` (compared case-insensitively).
pub fn is_valid_answer(answer: &str, language: Language, invalid: &InvalidAnswers) -> bool {
    if answer.is_empty() {
        return false;
    }
    let lowered = answer.to_lowercase();
    !invalid
        .markers(language)
        .iter()
        .any(|marker| marker.to_lowercase() == lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_answer_trims() {
        assert_eq!(clean_answer("\n  Paris. \t"), "Paris.");
    }

    #[test]
    fn empty_answer_is_invalid() {
        assert!(!is_valid_answer("", Language::En, &InvalidAnswers::default()));
    }

    #[test]
    fn unknown_markers_per_language() {
        let invalid = InvalidAnswers::default();
        assert!(!is_valid_answer("Unknown.", Language::En, &invalid));
        assert!(!is_valid_answer("UNBEKANNT", Language::De, &invalid));
        // Markers only apply to their own language.
        assert!(is_valid_answer("unbekannt", Language::En, &invalid));
        assert!(is_valid_answer("Article discusses X.", Language::En, &invalid));
    }

    #[test]
    fn marker_must_match_whole_answer() {
        let invalid = InvalidAnswers::default();
        assert!(is_valid_answer("The author is unknown.", Language::En, &invalid));
    }
}
