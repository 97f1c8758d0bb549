//! Weld: structured diff and three-way merge preview engine.
//!
//! A pure, synchronous library for comparing immutable document versions:
//! - Hunk-based line diffs with configurable unchanged context
//! - Word-level refinement of modified lines
//! - Merge previews classifying every changed region as clean or conflicting
//!
//! The engine owns no storage, session, or transport; callers hand it two
//! (or three) content strings plus options and get back a self-contained,
//! serializable value. Input size and output ceilings are enforced through
//! [`EngineConfig`].

pub mod config;
pub mod diff;
pub mod error;
pub mod merge;
pub mod prepare;

pub use config::{DiffMode, DiffOptions, EngineConfig};
pub use diff::{
    compute_diff, Change, ChangeKind, ContextLine, DiffEngine, DiffResult, DiffStats, Hunk, Token,
    TokenKind, WordDiff,
};
pub use error::{ConfigError, Result, WeldError};
pub use merge::{
    compute_merge_preview, ConflictRegion, MergeHunk, MergeHunkKind, MergeHunkStatus,
    MergePreviewResult, MergeSummary, PreviewStatus,
};
