//! Grouping of alignment operations into context-bounded hunks.
//!
//! A single `HunkBuilder` is constructed when a change opens a hunk and
//! consumed on finalize; equal lines inside an open hunk accumulate as
//! trailing context and are discarded again if a later change keeps the
//! hunk open.

use super::line::{AlignOp, OpKind};
use super::types::{Change, ChangeKind, ContextLine, Hunk};

/// Group an op stream into hunks.
///
/// Returns the hunks plus a flag set when `max_hunks` cut collection short.
pub(crate) fn group_hunks(
    ops: &[AlignOp],
    context: usize,
    max_hunks: usize,
    max_changes_per_hunk: usize,
) -> (Vec<Hunk>, bool) {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut truncated = false;
    let mut builder: Option<HunkBuilder> = None;
    // Index just past the last op claimed by a finalized hunk; backward
    // context collection never crosses it, which keeps hunks disjoint.
    let mut consumed = 0usize;

    for (i, op) in ops.iter().enumerate() {
        match op.kind {
            OpKind::Equal => {
                if builder.is_none() {
                    continue;
                }
                let full = if context == 0 {
                    true
                } else {
                    let open = builder.as_mut().expect("hunk builder open");
                    open.context_after.push(context_line(op));
                    open.context_after.truncate(context);
                    open.context_after.len() >= context
                };
                if full {
                    if let Some(open) = builder.take() {
                        hunks.push(open.finalize(max_changes_per_hunk));
                    }
                    // With no context the equal op itself stays unclaimed.
                    consumed = if context == 0 { i } else { i + 1 };
                }
            }
            _ => {
                if builder.is_none() {
                    if hunks.len() >= max_hunks {
                        truncated = true;
                        break;
                    }
                    builder = Some(HunkBuilder::open(ops, i, context, consumed));
                }
                if let Some(open) = builder.as_mut() {
                    // A change while collecting trailing context cancels the
                    // close-out; the equals gathered so far are dropped.
                    open.context_after.clear();
                    open.changes.push(change_from(op));
                }
            }
        }
    }

    if let Some(open) = builder.take() {
        hunks.push(open.finalize(max_changes_per_hunk));
    }

    (hunks, truncated)
}

/// Accumulates one hunk; consumed by [`HunkBuilder::finalize`].
#[derive(Debug, Default)]
struct HunkBuilder {
    /// 1-indexed fallback start positions from the opening op.
    first_old: usize,
    first_new: usize,
    context_before: Vec<ContextLine>,
    changes: Vec<Change>,
    context_after: Vec<ContextLine>,
}

impl HunkBuilder {
    /// Open a hunk at op `index`, seeding up to `context` trailing equal
    /// lines scanned backward (stopping at `consumed`).
    fn open(ops: &[AlignOp], index: usize, context: usize, consumed: usize) -> Self {
        let op = &ops[index];
        let scan_start = index.saturating_sub(context).max(consumed);
        let context_before = ops[scan_start..index]
            .iter()
            .filter(|candidate| candidate.kind == OpKind::Equal)
            .map(context_line)
            .collect();

        Self {
            first_old: op.old_index + 1,
            first_new: op.new_index + 1,
            context_before,
            changes: Vec::new(),
            context_after: Vec::new(),
        }
    }

    fn finalize(self, max_changes_per_hunk: usize) -> Hunk {
        let (old_start, new_start) = match self.context_before.first() {
            Some(line) => (
                line.old_line.unwrap_or(self.first_old),
                line.new_line.unwrap_or(self.first_new),
            ),
            None => (self.first_old, self.first_new),
        };

        let mut changes = self.changes;
        let mut truncated = false;
        if changes.len() > max_changes_per_hunk {
            changes.truncate(max_changes_per_hunk);
            truncated = true;
        }

        let old_lines = self.context_before.len()
            + changes.iter().filter(|c| c.old_text.is_some()).count()
            + self.context_after.len();
        let new_lines = self.context_before.len()
            + changes.iter().filter(|c| c.new_text.is_some()).count()
            + self.context_after.len();

        Hunk {
            old_start,
            old_lines,
            new_start,
            new_lines,
            context_before: self.context_before,
            changes,
            context_after: self.context_after,
            truncated,
        }
    }
}

fn context_line(op: &AlignOp) -> ContextLine {
    ContextLine {
        old_line: Some(op.old_index + 1),
        new_line: Some(op.new_index + 1),
        text: op.old_text.clone().unwrap_or_default(),
    }
}

fn change_from(op: &AlignOp) -> Change {
    match op.kind {
        OpKind::Insert => Change {
            kind: ChangeKind::Add,
            old_line: None,
            new_line: Some(op.new_index + 1),
            old_text: None,
            new_text: op.new_text.clone(),
            word_diff: None,
        },
        OpKind::Delete => Change {
            kind: ChangeKind::Delete,
            old_line: Some(op.old_index + 1),
            new_line: None,
            old_text: op.old_text.clone(),
            new_text: None,
            word_diff: None,
        },
        _ => Change {
            kind: ChangeKind::Modify,
            old_line: Some(op.old_index + 1),
            new_line: Some(op.new_index + 1),
            old_text: op.old_text.clone(),
            new_text: op.new_text.clone(),
            word_diff: None,
        },
    }
}
