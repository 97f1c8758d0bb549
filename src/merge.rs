//! Three-way merge preview: conflict detection between two diffs.
//!
//! Both input diffs share the base document, so their hunks' `old_start`/
//! `old_lines` spans live in the same coordinate space and overlap can be
//! decided by half-open interval intersection.

use serde::{Deserialize, Serialize};

use crate::config::DiffOptions;
use crate::diff::{DiffEngine, DiffStats, Hunk};
use crate::error::Result;

/// Overall outcome of a merge preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Clean,
    Conflicted,
}

/// Outcome for a single merge hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeHunkStatus {
    Clean,
    Conflict,
}

/// How a merge hunk relates the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeHunkKind {
    LocalOnly,
    HeadOnly,
    Identical,
    Overlapping,
}

/// Base-document line span covered by two overlapping, non-identical edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRegion {
    /// 1-indexed first base line of the region.
    pub start: usize,
    /// Exclusive end line of the region.
    pub end: usize,
}

/// One classified region of the merge preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeHunk {
    pub status: MergeHunkStatus,
    #[serde(rename = "type")]
    pub kind: MergeHunkKind,
    pub local_hunk: Option<Hunk>,
    pub head_hunk: Option<Hunk>,
    /// Present only for `Overlapping`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_region: Option<ConflictRegion>,
}

/// Aggregate counts for a merge preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub total_hunks: usize,
    pub clean_count: usize,
    pub conflict_count: usize,
    pub local_stats: DiffStats,
    pub head_stats: DiffStats,
}

/// Result of previewing a three-way merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePreviewResult {
    pub status: PreviewStatus,
    pub hunks: Vec<MergeHunk>,
    pub summary: MergeSummary,
}

/// Preview a three-way merge with a default-configured engine.
pub fn compute_merge_preview(
    base: &str,
    local: &str,
    head: &str,
    options: &DiffOptions,
) -> Result<MergePreviewResult> {
    DiffEngine::default().merge_preview(base, local, head, options)
}

/// Classify every changed region of the two diffs.
///
/// Each head hunk is consumed by the first local hunk it overlaps; leftovers
/// become head-only entries. The result is ordered by base start position.
pub(crate) fn detect_conflicts(local_hunks: &[Hunk], head_hunks: &[Hunk]) -> Vec<MergeHunk> {
    let mut consumed = vec![false; head_hunks.len()];
    let mut merged: Vec<MergeHunk> = Vec::new();

    for local_hunk in local_hunks {
        let (local_start, local_end) = base_span(local_hunk);
        let mut overlapped = false;

        for (idx, head_hunk) in head_hunks.iter().enumerate() {
            if consumed[idx] {
                continue;
            }
            let (head_start, head_end) = base_span(head_hunk);
            if !(local_start < head_end && head_start < local_end) {
                continue;
            }
            consumed[idx] = true;
            overlapped = true;

            if changes_identical(local_hunk, head_hunk) {
                merged.push(MergeHunk {
                    status: MergeHunkStatus::Clean,
                    kind: MergeHunkKind::Identical,
                    local_hunk: Some(local_hunk.clone()),
                    head_hunk: Some(head_hunk.clone()),
                    conflict_region: None,
                });
            } else {
                merged.push(MergeHunk {
                    status: MergeHunkStatus::Conflict,
                    kind: MergeHunkKind::Overlapping,
                    local_hunk: Some(local_hunk.clone()),
                    head_hunk: Some(head_hunk.clone()),
                    conflict_region: Some(ConflictRegion {
                        start: local_start.min(head_start),
                        end: local_end.max(head_end),
                    }),
                });
            }
        }

        if !overlapped {
            merged.push(MergeHunk {
                status: MergeHunkStatus::Clean,
                kind: MergeHunkKind::LocalOnly,
                local_hunk: Some(local_hunk.clone()),
                head_hunk: None,
                conflict_region: None,
            });
        }
    }

    for (idx, head_hunk) in head_hunks.iter().enumerate() {
        if !consumed[idx] {
            merged.push(MergeHunk {
                status: MergeHunkStatus::Clean,
                kind: MergeHunkKind::HeadOnly,
                local_hunk: None,
                head_hunk: Some(head_hunk.clone()),
                conflict_region: None,
            });
        }
    }

    merged.sort_by_key(|hunk| {
        hunk.local_hunk
            .as_ref()
            .or(hunk.head_hunk.as_ref())
            .map(|h| h.old_start)
            .unwrap_or(0)
    });
    merged
}

/// Half-open base-coordinate interval covered by a hunk.
fn base_span(hunk: &Hunk) -> (usize, usize) {
    (hunk.old_start, hunk.old_start + hunk.old_lines)
}

/// Element-wise change comparison: same kind and text on both sides.
fn changes_identical(local: &Hunk, head: &Hunk) -> bool {
    local.changes.len() == head.changes.len()
        && local
            .changes
            .iter()
            .zip(head.changes.iter())
            .all(|(a, b)| a.kind == b.kind && a.old_text == b.old_text && a.new_text == b.new_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Change, ChangeKind};

    fn modify(old_line: usize, old_text: &str, new_text: &str) -> Change {
        Change {
            kind: ChangeKind::Modify,
            old_line: Some(old_line),
            new_line: Some(old_line),
            old_text: Some(old_text.to_string()),
            new_text: Some(new_text.to_string()),
            word_diff: None,
        }
    }

    fn hunk(old_start: usize, old_lines: usize, changes: Vec<Change>) -> Hunk {
        Hunk {
            old_start,
            old_lines,
            new_start: old_start,
            new_lines: old_lines,
            context_before: Vec::new(),
            changes,
            context_after: Vec::new(),
            truncated: false,
        }
    }

    #[test]
    fn test_disjoint_hunks_stay_clean() {
        let local = vec![hunk(1, 1, vec![modify(1, "a", "x")])];
        let head = vec![hunk(5, 1, vec![modify(5, "e", "y")])];
        let merged = detect_conflicts(&local, &head);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind, MergeHunkKind::LocalOnly);
        assert_eq!(merged[1].kind, MergeHunkKind::HeadOnly);
        assert!(merged.iter().all(|h| h.status == MergeHunkStatus::Clean));
    }

    #[test]
    fn test_overlap_with_different_edits_conflicts() {
        let local = vec![hunk(2, 3, vec![modify(3, "base", "local")])];
        let head = vec![hunk(3, 3, vec![modify(3, "base", "head")])];
        let merged = detect_conflicts(&local, &head);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, MergeHunkStatus::Conflict);
        assert_eq!(merged[0].kind, MergeHunkKind::Overlapping);
        assert_eq!(
            merged[0].conflict_region,
            Some(ConflictRegion { start: 2, end: 6 })
        );
        assert!(merged[0].local_hunk.is_some());
        assert!(merged[0].head_hunk.is_some());
    }

    #[test]
    fn test_identical_edits_are_clean() {
        let local = vec![hunk(2, 1, vec![modify(2, "base", "same")])];
        let head = vec![hunk(2, 1, vec![modify(2, "base", "same")])];
        let merged = detect_conflicts(&local, &head);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, MergeHunkStatus::Clean);
        assert_eq!(merged[0].kind, MergeHunkKind::Identical);
        assert!(merged[0].conflict_region.is_none());
    }

    #[test]
    fn test_result_ordered_by_base_start() {
        let local = vec![hunk(8, 1, vec![modify(8, "h", "x")])];
        let head = vec![hunk(2, 1, vec![modify(2, "b", "y")])];
        let merged = detect_conflicts(&local, &head);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind, MergeHunkKind::HeadOnly);
        assert_eq!(merged[1].kind, MergeHunkKind::LocalOnly);
    }

    #[test]
    fn test_adjacent_half_open_spans_do_not_overlap() {
        // [1,3) and [3,5) share only the boundary.
        let local = vec![hunk(1, 2, vec![modify(1, "a", "x")])];
        let head = vec![hunk(3, 2, vec![modify(3, "c", "y")])];
        let merged = detect_conflicts(&local, &head);
        assert!(merged.iter().all(|h| h.status == MergeHunkStatus::Clean));
    }
}
