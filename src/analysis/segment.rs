//! Clause segmentation for reverse Q&A.

use std::sync::LazyLock;

use regex::Regex;

/// A whitespace run containing at least one empty line.
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split document text into candidate clauses on blank lines.
///
/// Segments that are empty after trimming are dropped; the rest are
/// returned verbatim, in document order. Text without blank lines is a
/// single segment.
pub fn split_clauses(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}

/// Whether a yes/no classifier answer is affirmative.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_uppercase().starts_with("YES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_blank_lines() {
        let text = "1. Pay rent monthly.\n\n2. No pets allowed.";
        assert_eq!(
            split_clauses(text),
            vec!["1. Pay rent monthly.", "2. No pets allowed."]
        );
    }

    #[test]
    fn test_whitespace_only_lines_count_as_blank() {
        let text = "A.\n  \t\n\nB.\r\n\r\nC.";
        assert_eq!(split_clauses(text), vec!["A.", "B.\r", "C."]);
    }

    #[test]
    fn test_segments_are_not_trimmed() {
        let text = "  indented clause\n\n\n   \n\nnext ";
        assert_eq!(split_clauses(text), vec!["  indented clause", "next "]);
    }

    #[test]
    fn test_single_newlines_do_not_split() {
        let text = "1. First.\n2. Second.\n3. Third.";
        assert_eq!(split_clauses(text), vec![text]);
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(split_clauses("").is_empty());
        assert!(split_clauses("\n\n   \n\n").is_empty());
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("  yes, it is relevant"));
        assert!(is_affirmative("Yes."));
        assert!(!is_affirmative("NO"));
        assert!(!is_affirmative("The answer is yes"));
        assert!(!is_affirmative(""));
    }
}
