//! Sequence alignment between two line (or token) sequences.
//!
//! Classic LCS table plus backtrack, then a pairing pass that turns each
//! changed gap's k-th deletion + k-th insertion into a `Replace`. The
//! `Replace` pairing is what drives modify handling downstream; unpaired
//! lines stay independent deletes/inserts.

/// Kind of a single alignment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// One aligned operation over the old/new sequences.
///
/// `old_index`/`new_index` are 0-based positions at which the operation
/// applies; the text is present only on the side the operation touches.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlignOp {
    pub kind: OpKind,
    pub old_index: usize,
    pub new_index: usize,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum RawStep {
    Equal,
    Delete,
    Insert,
}

/// Align two sequences, pairing deletions with insertions into replacements.
pub(crate) fn lcs_align(old: &[&str], new: &[&str]) -> Vec<AlignOp> {
    let m = old.len();
    let n = new.len();

    // Build LCS table.
    let mut lcs = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            if old[i - 1] == new[j - 1] {
                lcs[i][j] = lcs[i - 1][j - 1] + 1;
            } else {
                lcs[i][j] = lcs[i - 1][j].max(lcs[i][j - 1]);
            }
        }
    }

    // Backtrack to a raw step sequence.
    let mut raw = Vec::with_capacity(m + n);
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            raw.push(RawStep::Equal);
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            raw.push(RawStep::Insert);
            j -= 1;
        } else {
            raw.push(RawStep::Delete);
            i -= 1;
        }
    }
    raw.reverse();

    pair_gaps(old, new, &raw)
}

/// Walk the raw steps, emitting positions and pairing each changed gap.
fn pair_gaps(old: &[&str], new: &[&str], raw: &[RawStep]) -> Vec<AlignOp> {
    let mut ops = Vec::with_capacity(raw.len());
    let mut old_index = 0usize;
    let mut new_index = 0usize;
    let mut k = 0usize;

    while k < raw.len() {
        if matches!(raw[k], RawStep::Equal) {
            ops.push(AlignOp {
                kind: OpKind::Equal,
                old_index,
                new_index,
                old_text: Some(old[old_index].to_string()),
                new_text: Some(new[new_index].to_string()),
            });
            old_index += 1;
            new_index += 1;
            k += 1;
            continue;
        }

        // Changed gap: count deletions and insertions up to the next equal.
        let mut deletions = 0usize;
        let mut insertions = 0usize;
        while k < raw.len() {
            match raw[k] {
                RawStep::Delete => deletions += 1,
                RawStep::Insert => insertions += 1,
                RawStep::Equal => break,
            }
            k += 1;
        }

        let paired = deletions.min(insertions);
        for _ in 0..paired {
            ops.push(AlignOp {
                kind: OpKind::Replace,
                old_index,
                new_index,
                old_text: Some(old[old_index].to_string()),
                new_text: Some(new[new_index].to_string()),
            });
            old_index += 1;
            new_index += 1;
        }
        for _ in paired..deletions {
            ops.push(AlignOp {
                kind: OpKind::Delete,
                old_index,
                new_index,
                old_text: Some(old[old_index].to_string()),
                new_text: None,
            });
            old_index += 1;
        }
        for _ in paired..insertions {
            ops.push(AlignOp {
                kind: OpKind::Insert,
                old_index,
                new_index,
                old_text: None,
                new_text: Some(new[new_index].to_string()),
            });
            new_index += 1;
        }
    }

    ops
}
