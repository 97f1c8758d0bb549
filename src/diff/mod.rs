//! Structured diff computation.
//!
//! The pipeline: size check, optional HTML-to-text preparation, line
//! alignment, stats, hunk grouping, and word-level refinement when the
//! resolved mode asks for it.

mod hunks;
mod line;
mod types;
mod words;

pub use types::{
    Change, ChangeKind, ContextLine, DiffResult, DiffStats, Hunk, Token, TokenKind, WordDiff,
};

use tracing::debug;

use crate::config::{DiffMode, DiffOptions, EngineConfig};
use crate::error::{Result, WeldError};
use crate::merge::{
    detect_conflicts, MergeHunkStatus, MergePreviewResult, MergeSummary, PreviewStatus,
};
use crate::prepare::prepare;

use line::{AlignOp, OpKind};

/// Diff and merge-preview engine holding the configured limits.
///
/// Every computation allocates its own working structures and returns a
/// self-contained value; a single engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    config: EngineConfig,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DiffEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute a structured diff between two texts.
    pub fn compute(&self, left: &str, right: &str, options: &DiffOptions) -> Result<DiffResult> {
        self.check_size(left)?;
        self.check_size(right)?;

        let left = prepare(left, options.extract_text_from_html);
        let right = prepare(right, options.extract_text_from_html);
        let old_lines: Vec<&str> = left.lines().collect();
        let new_lines: Vec<&str> = right.lines().collect();

        let ops = line::lcs_align(&old_lines, &new_lines);
        let stats = compute_stats(&ops, self.config.split_similarity_threshold);

        let context = options.context.unwrap_or(self.config.default_context);
        let (mut hunks, truncated) = hunks::group_hunks(
            &ops,
            context,
            self.config.max_hunks,
            self.config.max_changes_per_hunk,
        );

        let total_changes: usize = hunks.iter().map(|hunk| hunk.changes.len()).sum();
        let threshold = options
            .word_threshold_lines
            .unwrap_or(self.config.word_threshold_lines);
        let mode = resolve_mode(options.mode, total_changes, threshold);
        if mode == DiffMode::Word {
            words::refine_hunks(&mut hunks);
        }

        debug!(
            old_lines = old_lines.len(),
            new_lines = new_lines.len(),
            hunks = hunks.len(),
            total_changes,
            truncated,
            ?mode,
            "Computed diff"
        );

        Ok(DiffResult {
            hunks,
            stats,
            truncated,
            mode,
        })
    }

    /// Preview a three-way merge of two edits sharing a base.
    ///
    /// When base and one side are byte-identical there is nothing to merge
    /// on that side and the preview is trivially clean; the equality checks
    /// are exact, not semantic.
    pub fn merge_preview(
        &self,
        base: &str,
        local: &str,
        head: &str,
        options: &DiffOptions,
    ) -> Result<MergePreviewResult> {
        self.check_size(base)?;
        self.check_size(local)?;
        self.check_size(head)?;

        if base == head || base == local {
            return Ok(MergePreviewResult {
                status: PreviewStatus::Clean,
                hunks: Vec::new(),
                summary: MergeSummary::default(),
            });
        }

        let local_diff = self.compute(base, local, options)?;
        let head_diff = self.compute(base, head, options)?;

        let hunks = detect_conflicts(&local_diff.hunks, &head_diff.hunks);
        let conflict_count = hunks
            .iter()
            .filter(|hunk| hunk.status == MergeHunkStatus::Conflict)
            .count();
        let status = if conflict_count > 0 {
            PreviewStatus::Conflicted
        } else {
            PreviewStatus::Clean
        };

        debug!(
            total_hunks = hunks.len(),
            conflict_count,
            ?status,
            "Computed merge preview"
        );

        Ok(MergePreviewResult {
            status,
            summary: MergeSummary {
                total_hunks: hunks.len(),
                clean_count: hunks.len() - conflict_count,
                conflict_count,
                local_stats: local_diff.stats,
                head_stats: head_diff.stats,
            },
            hunks,
        })
    }

    fn check_size(&self, content: &str) -> Result<()> {
        let limit = self.config.max_content_size_bytes;
        if content.len() > limit {
            return Err(WeldError::ContentTooLarge {
                size: content.len(),
                limit,
            });
        }
        Ok(())
    }
}

/// Compute a structured diff with a default-configured engine.
pub fn compute_diff(left: &str, right: &str, options: &DiffOptions) -> Result<DiffResult> {
    DiffEngine::default().compute(left, right, options)
}

/// Resolve the requested mode: `Auto` picks word granularity for diffs small
/// enough to decorate.
fn resolve_mode(requested: DiffMode, total_changes: usize, threshold: usize) -> DiffMode {
    match requested {
        DiffMode::Line => DiffMode::Line,
        DiffMode::Word => DiffMode::Word,
        DiffMode::Auto => {
            if total_changes <= threshold {
                DiffMode::Word
            } else {
                DiffMode::Line
            }
        }
    }
}

/// Count line-level operations, splitting near-total rewrites.
///
/// A replaced line whose old/new similarity falls below the threshold is a
/// rewrite, not an edit; it counts as one addition plus one deletion while
/// the hunk keeps its single `Modify` record.
fn compute_stats(ops: &[AlignOp], split_threshold: f64) -> DiffStats {
    let mut stats = DiffStats::default();
    for op in ops {
        match op.kind {
            OpKind::Equal => stats.unchanged += 1,
            OpKind::Insert => stats.additions += 1,
            OpKind::Delete => stats.deletions += 1,
            OpKind::Replace => {
                let similarity = line_similarity(
                    op.old_text.as_deref().unwrap_or(""),
                    op.new_text.as_deref().unwrap_or(""),
                );
                if similarity < split_threshold {
                    stats.additions += 1;
                    stats.deletions += 1;
                } else {
                    stats.modifications += 1;
                }
            }
        }
    }
    stats
}

/// Normalized edit-distance similarity over char counts, in `0.0..=1.0`.
fn line_similarity(old: &str, new: &str) -> f64 {
    let max_len = old.chars().count().max(new.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(old, new);
    max_len.saturating_sub(distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs_yield_no_hunks() {
        let text = "same\ntext\nhere\n";
        let diff = compute_diff(text, text, &DiffOptions::default()).unwrap();
        assert!(diff.hunks.is_empty());
        assert!(!diff.truncated);
        assert_eq!(diff.stats.unchanged, 3);
        assert_eq!(diff.stats.additions, 0);
        assert_eq!(diff.stats.deletions, 0);
        assert_eq!(diff.stats.modifications, 0);
    }

    #[test]
    fn test_similar_replacement_counts_as_modification() {
        let diff = compute_diff(
            "Hello world\n",
            "Hello worlds\n",
            &DiffOptions::default(),
        )
        .unwrap();
        assert_eq!(diff.stats.modifications, 1);
        assert_eq!(diff.stats.additions, 0);
        assert_eq!(diff.stats.deletions, 0);
    }

    #[test]
    fn test_dissimilar_replacement_splits_into_add_and_delete() {
        let diff = compute_diff(
            "aaaaaaaaaa\n",
            "zzzzzzzzzz\n",
            &DiffOptions::default(),
        )
        .unwrap();
        // Stats split, but the hunk keeps a single Modify record.
        assert_eq!(diff.stats.additions, 1);
        assert_eq!(diff.stats.deletions, 1);
        assert_eq!(diff.stats.modifications, 0);
        assert_eq!(diff.hunks[0].changes.len(), 1);
        assert_eq!(diff.hunks[0].changes[0].kind, ChangeKind::Modify);
    }

    #[test]
    fn test_line_similarity_bounds() {
        assert!((line_similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!((line_similarity("abc", "abc") - 1.0).abs() < f64::EPSILON);
        assert!(line_similarity("aaaa", "zzzz") < 0.01);
    }

    #[test]
    fn test_explicit_line_mode_skips_refinement() {
        let options = DiffOptions {
            mode: DiffMode::Line,
            ..Default::default()
        };
        let diff = compute_diff("Hello world\n", "Hello there\n", &options).unwrap();
        assert_eq!(diff.mode, DiffMode::Line);
        assert!(diff.hunks[0].changes[0].word_diff.is_none());
    }

    #[test]
    fn test_auto_mode_refines_small_diffs() {
        let diff = compute_diff(
            "Hello world\nSame\n",
            "Hello there\nSame\n",
            &DiffOptions::default(),
        )
        .unwrap();
        assert_eq!(diff.mode, DiffMode::Word);
        let word_diff = diff.hunks[0].changes[0].word_diff.as_ref().unwrap();
        assert!(word_diff
            .old_tokens
            .iter()
            .any(|t| t.kind == TokenKind::Deleted));
    }

    #[test]
    fn test_content_too_large_rejected() {
        let engine = DiffEngine::new(EngineConfig {
            max_content_size_bytes: 8,
            ..Default::default()
        });
        let err = engine
            .compute("123456789", "short", &DiffOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            WeldError::ContentTooLarge { size: 9, limit: 8 }
        ));
    }

    #[test]
    fn test_html_extraction_through_pipeline() {
        let options = DiffOptions {
            extract_text_from_html: true,
            ..Default::default()
        };
        let diff = compute_diff(
            "<p>Hello world</p>",
            "<p>Hello there</p>",
            &options,
        )
        .unwrap();
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(
            diff.hunks[0].changes[0].old_text.as_deref(),
            Some("Hello world")
        );
    }

    #[test]
    fn test_merge_preview_fast_paths() {
        let engine = DiffEngine::default();
        let options = DiffOptions::default();

        let no_remote = engine
            .merge_preview("base\n", "edited\n", "base\n", &options)
            .unwrap();
        assert_eq!(no_remote.status, PreviewStatus::Clean);
        assert!(no_remote.hunks.is_empty());

        let no_local = engine
            .merge_preview("base\n", "base\n", "edited\n", &options)
            .unwrap();
        assert_eq!(no_local.status, PreviewStatus::Clean);
        assert!(no_local.hunks.is_empty());
    }
}
