//! Diff engine - aligns two line arrays and emits ordered edit operations.

use serde::{Deserialize, Serialize};

use super::lcs;

/// Above this many lines on either side the engine stops allocating the
/// full LCS table and switches to the linear-space strategy.
pub const DEFAULT_LCS_LINE_LIMIT: usize = 2000;

/// Kind of a single diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp {
    Equal,
    Insert,
    Delete,
}

/// One emitted operation. Line numbers are 1-based; `delete` carries only the
/// old side, `insert` only the new side, `equal` both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub op: DiffOp,
    pub old_line_no: Option<usize>,
    pub new_line_no: Option<usize>,
    pub text: String,
}

impl DiffLine {
    fn equal(old_idx: usize, new_idx: usize, text: &str) -> Self {
        Self {
            op: DiffOp::Equal,
            old_line_no: Some(old_idx + 1),
            new_line_no: Some(new_idx + 1),
            text: text.to_string(),
        }
    }

    fn delete(old_idx: usize, text: &str) -> Self {
        Self {
            op: DiffOp::Delete,
            old_line_no: Some(old_idx + 1),
            new_line_no: None,
            text: text.to_string(),
        }
    }

    fn insert(new_idx: usize, text: &str) -> Self {
        Self {
            op: DiffOp::Insert,
            old_line_no: None,
            new_line_no: Some(new_idx + 1),
            text: text.to_string(),
        }
    }
}

/// Summary counters shown next to a rendered diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut stats, line| {
            match line.op {
                DiffOp::Equal => stats.unchanged += 1,
                DiffOp::Insert => stats.additions += 1,
                DiffOp::Delete => stats.deletions += 1,
            }
            stats
        })
    }

    /// True when old and new were identical.
    pub fn is_unchanged(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

/// Line diff with a configurable switch-over to linear-space LCS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    lcs_line_limit: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LCS_LINE_LIMIT)
    }
}

impl DiffEngine {
    pub fn new(lcs_line_limit: usize) -> Self {
        Self { lcs_line_limit }
    }

    pub fn lcs_line_limit(&self) -> usize {
        self.lcs_line_limit
    }

    /// Diffs `old_text` against `new_text`.
    ///
    /// Each gap before an LCS anchor is emitted as all skipped old lines
    /// (`delete`), then all skipped new lines (`insert`), then the anchor
    /// (`equal`).
    pub fn compute(&self, old_text: &str, new_text: &str) -> Vec<DiffLine> {
        let old = split_lines(old_text);
        let new = split_lines(new_text);

        let anchors = if old.len().max(new.len()) > self.lcs_line_limit {
            tracing::debug!(
                old_lines = old.len(),
                new_lines = new.len(),
                limit = self.lcs_line_limit,
                "diff input above table limit, using linear-space LCS"
            );
            lcs::linear_space_anchors(&old, &new)
        } else {
            lcs::table_anchors(&old, &new)
        };

        let mut out = Vec::with_capacity(old.len() + new.len() - anchors.len());
        let (mut oi, mut ni) = (0usize, 0usize);
        for (ai, bi) in anchors {
            out.extend((oi..ai).map(|i| DiffLine::delete(i, old[i])));
            out.extend((ni..bi).map(|j| DiffLine::insert(j, new[j])));
            out.push(DiffLine::equal(ai, bi, old[ai]));
            oi = ai + 1;
            ni = bi + 1;
        }
        out.extend((oi..old.len()).map(|i| DiffLine::delete(i, old[i])));
        out.extend((ni..new.len()).map(|j| DiffLine::insert(j, new[j])));
        out
    }
}

/// Diff with the default table limit.
pub fn compute_diff(old_text: &str, new_text: &str) -> Vec<DiffLine> {
    DiffEngine::default().compute(old_text, new_text)
}

/// Splits on `\n`. The empty string is zero lines, never one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Inverse of [`split_lines`].
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(lines: &[DiffLine]) -> Vec<(DiffOp, &str)> {
        lines.iter().map(|l| (l.op, l.text.as_str())).collect()
    }

    #[test]
    fn identical_inputs_produce_only_equal_in_order() {
        let diff = compute_diff("one\ntwo\nthree", "one\ntwo\nthree");
        assert_eq!(
            ops(&diff),
            vec![
                (DiffOp::Equal, "one"),
                (DiffOp::Equal, "two"),
                (DiffOp::Equal, "three")
            ]
        );
        assert_eq!(diff[2].old_line_no, Some(3));
        assert_eq!(diff[2].new_line_no, Some(3));
    }

    #[test]
    fn replaced_line_emits_delete_before_insert() {
        let diff = compute_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            ops(&diff),
            vec![
                (DiffOp::Equal, "a"),
                (DiffOp::Delete, "b"),
                (DiffOp::Insert, "x"),
                (DiffOp::Equal, "c")
            ]
        );
        assert_eq!(diff[1].old_line_no, Some(2));
        assert_eq!(diff[1].new_line_no, None);
        assert_eq!(diff[2].old_line_no, None);
        assert_eq!(diff[2].new_line_no, Some(2));
    }

    #[test]
    fn disjoint_inputs_delete_everything_then_insert_everything() {
        let diff = compute_diff("a\nb", "x\ny\nz");
        assert_eq!(
            ops(&diff),
            vec![
                (DiffOp::Delete, "a"),
                (DiffOp::Delete, "b"),
                (DiffOp::Insert, "x"),
                (DiffOp::Insert, "y"),
                (DiffOp::Insert, "z")
            ]
        );
    }

    #[test]
    fn empty_text_is_zero_lines() {
        assert!(compute_diff("", "").is_empty());
        assert_eq!(ops(&compute_diff("", "hello")), vec![(DiffOp::Insert, "hello")]);
        assert_eq!(ops(&compute_diff("bye", "")), vec![(DiffOp::Delete, "bye")]);
    }

    #[test]
    fn trailing_newline_is_a_line_of_its_own() {
        let diff = compute_diff("a", "a\n");
        assert_eq!(ops(&diff), vec![(DiffOp::Equal, "a"), (DiffOp::Insert, "")]);
    }

    #[test]
    fn stats_count_each_op_kind() {
        let stats = DiffStats::from_lines(&compute_diff("a\nb\nc", "a\nx\ny\nc"));
        assert_eq!(
            stats,
            DiffStats {
                additions: 2,
                deletions: 1,
                unchanged: 2
            }
        );
        assert!(!stats.is_unchanged());
    }

    #[test]
    fn linear_space_path_keeps_op_contract() {
        let engine = DiffEngine::new(3);
        let diff = engine.compute("h\na\nb\nc\nt", "h\na\nx\nc\nt");
        assert_eq!(
            ops(&diff),
            vec![
                (DiffOp::Equal, "h"),
                (DiffOp::Equal, "a"),
                (DiffOp::Delete, "b"),
                (DiffOp::Insert, "x"),
                (DiffOp::Equal, "c"),
                (DiffOp::Equal, "t")
            ]
        );
    }

    #[test]
    fn join_inverts_split() {
        for text in ["", "a", "a\n", "\n\n", "x\ny"] {
            assert_eq!(join_lines(&split_lines(text)), text);
        }
    }
}
