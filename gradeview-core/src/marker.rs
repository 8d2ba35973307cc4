//! Block markers
//!
//! A marker is a line that starts a new answer block. There are three fixed
//! section literals and one numbered-answer form (`#課題解答1.2`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character that prefixes header and marker lines
pub const MARKER_CHAR: char = '#';

/// Section literal for the answer body
pub const CONTENT_LITERAL: &str = "#回答内容";
/// Section literal for the student's comment
pub const COMMENT_LITERAL: &str = "#コメント";
/// Section literal for the list of submitted files
pub const SUBMITTED_FILE_LITERAL: &str = "#提出ファイル";

static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#\s*)?課題解答(\d+)\.(\d+)").expect("valid numbered answer regex")
});

static NUMBERED_ANYWHERE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"課題解答\d+\.\d+").expect("valid numbered answer regex"));

/// A recognized block marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Content,
    Comment,
    SubmittedFile,
    NumberedAnswer { major: u32, minor: u32 },
}

impl Marker {
    /// Classify a single line, returning the marker it starts (if any)
    pub fn classify(line: &str) -> Option<Marker> {
        match line {
            CONTENT_LITERAL => return Some(Marker::Content),
            COMMENT_LITERAL => return Some(Marker::Comment),
            SUBMITTED_FILE_LITERAL => return Some(Marker::SubmittedFile),
            _ => {}
        }

        let caps = NUMBERED_LINE_RE.captures(line)?;
        // Out-of-range numbers saturate
        let major = caps[1].parse().unwrap_or(u32::MAX);
        let minor = caps[2].parse().unwrap_or(u32::MAX);
        Some(Marker::NumberedAnswer { major, minor })
    }

    /// Fixed sections fold into the header block instead of standing alone
    pub fn is_section(&self) -> bool {
        matches!(self, Marker::Content | Marker::Comment | Marker::SubmittedFile)
    }
}

/// Check whether a line starts a new block
pub fn is_block_beginning(line: &str) -> bool {
    Marker::classify(line).is_some()
}

/// Check whether free text (e.g. a notebook cell) contains a numbered-answer marker
pub fn contains_numbered_answer(text: &str) -> bool {
    NUMBERED_ANYWHERE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_literals() {
        assert_eq!(Marker::classify("#回答内容"), Some(Marker::Content));
        assert_eq!(Marker::classify("#コメント"), Some(Marker::Comment));
        assert_eq!(Marker::classify("#提出ファイル"), Some(Marker::SubmittedFile));
        assert!(Marker::Content.is_section());
    }

    #[test]
    fn test_section_literals_are_exact() {
        assert_eq!(Marker::classify("#回答内容 "), None);
        assert_eq!(Marker::classify(" #コメント"), None);
    }

    #[test]
    fn test_numbered_answer() {
        assert_eq!(
            Marker::classify("#課題解答1.2"),
            Some(Marker::NumberedAnswer { major: 1, minor: 2 })
        );
        assert_eq!(
            Marker::classify("#  課題解答10.03 extra"),
            Some(Marker::NumberedAnswer { major: 10, minor: 3 })
        );
        assert_eq!(
            Marker::classify("課題解答3.1"),
            Some(Marker::NumberedAnswer { major: 3, minor: 1 })
        );
        assert!(!Marker::NumberedAnswer { major: 1, minor: 1 }.is_section());
    }

    #[test]
    fn test_non_markers() {
        assert_eq!(Marker::classify("#Header"), None);
        assert_eq!(Marker::classify("課題解答1"), None);
        assert_eq!(Marker::classify("x = 1 # 課題解答1.1"), None);
        assert_eq!(Marker::classify(""), None);
    }

    #[test]
    fn test_contains_numbered_answer() {
        assert!(contains_numbered_answer("import numpy\n# 課題解答2.1\nprint(1)"));
        assert!(!contains_numbered_answer("print('課題解答')"));
    }
}
