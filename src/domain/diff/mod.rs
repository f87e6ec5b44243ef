//! Diff Module - Line-level diff between two document revisions.
//!
//! Pure and stateless. Texts are split on `\n` (the empty string is zero
//! lines) and compared with a longest-common-subsequence alignment.
//!
//! # Components
//!
//! - `DiffEngine` - Picks the LCS strategy by input size and emits ops
//! - `DiffLine` / `DiffOp` - One emitted operation with 1-based line numbers
//! - `DiffStats` - Added / removed / unchanged counters for review screens
//! - `apply_diff` - Replays ops onto the old text to rebuild the new one

mod apply;
mod engine;
mod lcs;

pub use apply::{apply_diff, DiffError};
pub use engine::{
    compute_diff, join_lines, split_lines, DiffEngine, DiffLine, DiffOp, DiffStats,
    DEFAULT_LCS_LINE_LIMIT,
};
