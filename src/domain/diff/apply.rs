//! Replaying a diff onto its source text.

use thiserror::Error;

use super::engine::{join_lines, split_lines, DiffLine, DiffOp};

/// Errors when an op list does not fit the text it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("line {line_no}: expected '{expected}', found '{found}'")]
    Mismatch {
        line_no: usize,
        expected: String,
        found: String,
    },

    #[error("diff reads past the end of the source ({lines} lines)")]
    PastEnd { lines: usize },

    #[error("diff consumed {consumed} of {lines} source lines")]
    Unconsumed { consumed: usize, lines: usize },
}

/// Applies `ops` to `old_text`, returning the reconstructed new text.
///
/// `equal` and `delete` ops are checked against the source line they consume.
pub fn apply_diff(old_text: &str, ops: &[DiffLine]) -> Result<String, DiffError> {
    let old = split_lines(old_text);
    let mut out: Vec<&str> = Vec::with_capacity(ops.len());
    let mut cursor = 0usize;

    for line in ops {
        match line.op {
            DiffOp::Insert => out.push(&line.text),
            DiffOp::Equal | DiffOp::Delete => {
                let source = *old.get(cursor).ok_or(DiffError::PastEnd { lines: old.len() })?;
                if source != line.text {
                    return Err(DiffError::Mismatch {
                        line_no: cursor + 1,
                        expected: line.text.clone(),
                        found: source.to_string(),
                    });
                }
                if line.op == DiffOp::Equal {
                    out.push(source);
                }
                cursor += 1;
            }
        }
    }

    if cursor != old.len() {
        return Err(DiffError::Unconsumed {
            consumed: cursor,
            lines: old.len(),
        });
    }
    Ok(join_lines(&out))
}
