//! Result types for structured diffs.
//!
//! Every value here is created fresh per computation and never mutated after
//! construction; the external HTTP layer serializes these to JSON as-is.

use serde::{Deserialize, Serialize};

use crate::config::DiffMode;

/// Result of computing a structured diff between two texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Hunks ordered by ascending `old_start`.
    pub hunks: Vec<Hunk>,
    /// Line-level operation counts.
    pub stats: DiffStats,
    /// True when the hunk cap cut off collection.
    pub truncated: bool,
    /// Granularity the diff was produced at (`Line` or `Word`).
    pub mode: DiffMode,
}

/// A contiguous region of changes with surrounding unchanged context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunk {
    /// 1-indexed first line of the hunk in the old text.
    pub old_start: usize,
    /// Number of old-side lines the retained records cover.
    pub old_lines: usize,
    /// 1-indexed first line of the hunk in the new text.
    pub new_start: usize,
    /// Number of new-side lines the retained records cover.
    pub new_lines: usize,
    /// Unchanged lines preceding the first change.
    pub context_before: Vec<ContextLine>,
    /// The changed lines.
    pub changes: Vec<Change>,
    /// Unchanged lines following the last change.
    pub context_after: Vec<ContextLine>,
    /// True when the per-hunk change cap cut off `changes`.
    pub truncated: bool,
}

/// An unchanged line retained adjacent to a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextLine {
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub text: String,
}

/// A single changed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// 1-indexed old-side line number; absent for additions.
    pub old_line: Option<usize>,
    /// 1-indexed new-side line number; absent for deletions.
    pub new_line: Option<usize>,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    /// Word-level refinement; present only on `Modify` when word mode ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_diff: Option<WordDiff>,
}

/// Kind of a changed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Delete,
    Modify,
}

/// Word-level breakdown of a modified line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDiff {
    pub old_tokens: Vec<Token>,
    pub new_tokens: Vec<Token>,
}

/// A merged run of consecutive same-typed word/whitespace tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Unchanged,
    Added,
    Deleted,
}

/// Counts of line-level operations across the whole diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub unchanged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_serializes_kind_as_type() {
        let change = Change {
            kind: ChangeKind::Modify,
            old_line: Some(2),
            new_line: Some(2),
            old_text: Some("old".to_string()),
            new_text: Some("new".to_string()),
            word_diff: None,
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "modify");
        assert!(json.get("word_diff").is_none());
    }

    #[test]
    fn test_token_roundtrip() {
        let token = Token {
            kind: TokenKind::Deleted,
            text: "world".to_string(),
        };
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
