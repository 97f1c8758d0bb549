//! Word-level refinement of modified lines.
//!
//! Lines are split into maximal runs of non-whitespace and whitespace (both
//! kept as tokens), aligned with the same LCS used for lines, and folded
//! into per-side spans with consecutive same-typed runs merged.

use super::line::{lcs_align, OpKind};
use super::types::{ChangeKind, Hunk, Token, TokenKind, WordDiff};

/// Attach a word diff to every `Modify` change that carries both sides.
pub(crate) fn refine_hunks(hunks: &mut [Hunk]) {
    for hunk in hunks {
        for change in &mut hunk.changes {
            if change.kind != ChangeKind::Modify {
                continue;
            }
            if let (Some(old_text), Some(new_text)) = (&change.old_text, &change.new_text) {
                change.word_diff = Some(word_diff(old_text, new_text));
            }
        }
    }
}

/// Compute per-side token spans for one modified line.
pub(crate) fn word_diff(old_text: &str, new_text: &str) -> WordDiff {
    let old_words = tokenize(old_text);
    let new_words = tokenize(new_text);
    let ops = lcs_align(&old_words, &new_words);

    let mut old_tokens: Vec<Token> = Vec::new();
    let mut new_tokens: Vec<Token> = Vec::new();
    for op in &ops {
        match op.kind {
            OpKind::Equal => {
                push_span(&mut old_tokens, TokenKind::Unchanged, op.old_text.as_deref());
                push_span(&mut new_tokens, TokenKind::Unchanged, op.new_text.as_deref());
            }
            OpKind::Delete => {
                push_span(&mut old_tokens, TokenKind::Deleted, op.old_text.as_deref());
            }
            OpKind::Insert => {
                push_span(&mut new_tokens, TokenKind::Added, op.new_text.as_deref());
            }
            OpKind::Replace => {
                push_span(&mut old_tokens, TokenKind::Deleted, op.old_text.as_deref());
                push_span(&mut new_tokens, TokenKind::Added, op.new_text.as_deref());
            }
        }
    }

    WordDiff {
        old_tokens,
        new_tokens,
    }
}

/// Append text to the side's last span when the type matches, else open a
/// new span.
fn push_span(tokens: &mut Vec<Token>, kind: TokenKind, text: Option<&str>) {
    let Some(text) = text else {
        return;
    };
    if let Some(last) = tokens.last_mut() {
        if last.kind == kind {
            last.text.push_str(text);
            return;
        }
    }
    tokens.push(Token {
        kind,
        text: text.to_string(),
    });
}

/// Split text into maximal runs of non-whitespace or whitespace characters.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let in_whitespace = ch.is_whitespace();
        let mut end = start + ch.len_utf8();
        while let Some(&(_, next_ch)) = chars.peek() {
            if next_ch.is_whitespace() != in_whitespace {
                break;
            }
            end += next_ch.len_utf8();
            chars.next();
        }
        tokens.push(&text[start..end]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_whitespace_runs() {
        assert_eq!(tokenize("hello world"), vec!["hello", " ", "world"]);
        assert_eq!(
            tokenize("  multiple   spaces  "),
            vec!["  ", "multiple", "   ", "spaces", "  "]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_word_diff_single_replacement() {
        let diff = word_diff("Hello world", "Hello there");
        assert_eq!(
            diff.old_tokens,
            vec![
                Token {
                    kind: TokenKind::Unchanged,
                    text: "Hello ".to_string(),
                },
                Token {
                    kind: TokenKind::Deleted,
                    text: "world".to_string(),
                },
            ]
        );
        assert_eq!(
            diff.new_tokens,
            vec![
                Token {
                    kind: TokenKind::Unchanged,
                    text: "Hello ".to_string(),
                },
                Token {
                    kind: TokenKind::Added,
                    text: "there".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_word_diff_merges_consecutive_spans() {
        let diff = word_diff("one two three", "three");
        assert_eq!(
            diff.old_tokens,
            vec![
                Token {
                    kind: TokenKind::Deleted,
                    text: "one two ".to_string(),
                },
                Token {
                    kind: TokenKind::Unchanged,
                    text: "three".to_string(),
                },
            ]
        );
        assert_eq!(diff.new_tokens.len(), 1);
        assert_eq!(diff.new_tokens[0].kind, TokenKind::Unchanged);
    }

    #[test]
    fn test_word_diff_pure_insertion() {
        let diff = word_diff("end", "start end");
        assert_eq!(diff.old_tokens.len(), 1);
        assert_eq!(diff.old_tokens[0].kind, TokenKind::Unchanged);
        assert_eq!(diff.new_tokens[0].kind, TokenKind::Added);
        assert_eq!(diff.new_tokens[0].text, "start ");
    }
}
