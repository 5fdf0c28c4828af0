//! Line-level diff between two text snapshots.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce an ordered
//! edit script of maximal runs: no two adjacent operations share a kind.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Kind of one diff operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// Lines present in both snapshots.
    Equal,
    /// Lines present only in the other snapshot.
    Insert,
    /// Lines present only in the base snapshot.
    Delete,
}

/// One maximal run of lines sharing a kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    pub kind: OpKind,
    pub lines: Vec<String>,
}

/// The result of diffing two text snapshots line by line.
///
/// Tallies are derived from the operations: `added_lines` is the total line
/// count across `Insert` runs, `removed_lines` across `Delete` runs, and
/// `unchanged_lines` across `Equal` runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiff {
    /// Ordered edit script of maximal runs.
    pub operations: Vec<DiffOp>,
    pub added_lines: usize,
    pub removed_lines: usize,
    pub unchanged_lines: usize,
}

impl LineDiff {
    /// Returns `true` if the two snapshots are line-identical.
    pub fn is_identity(&self) -> bool {
        self.added_lines == 0 && self.removed_lines == 0
    }

    /// Added/removed counts for merge reporting.
    pub fn stats(&self) -> DiffStats {
        DiffStats {
            added_lines: self.added_lines,
            removed_lines: self.removed_lines,
        }
    }
}

/// Added/removed line counts of one diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added_lines: usize,
    pub removed_lines: usize,
}

/// Compute a line-level diff from `base` to `other`.
///
/// Both inputs are split into lines; the edit script preserves order and
/// aligns on the longest common subsequence of lines. Identical inputs
/// yield a single `Equal` run covering every line.
pub fn compute_line_diff(base: &str, other: &str) -> LineDiff {
    if base == other {
        let lines: Vec<String> = base.lines().map(str::to_string).collect();
        let unchanged_lines = lines.len();
        return LineDiff {
            operations: vec![DiffOp {
                kind: OpKind::Equal,
                lines,
            }],
            added_lines: 0,
            removed_lines: 0,
            unchanged_lines,
        };
    }

    let text_diff = TextDiff::from_lines(base, other);

    let mut operations: Vec<DiffOp> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => OpKind::Equal,
            ChangeTag::Insert => OpKind::Insert,
            ChangeTag::Delete => OpKind::Delete,
        };
        let text = change.value().trim_end_matches('\n').to_string();
        // Coalesce into maximal runs: adjacent operations never share a kind.
        match operations.last_mut() {
            Some(op) if op.kind == kind => op.lines.push(text),
            _ => operations.push(DiffOp {
                kind,
                lines: vec![text],
            }),
        }
    }

    let mut added_lines = 0;
    let mut removed_lines = 0;
    let mut unchanged_lines = 0;
    for op in &operations {
        match op.kind {
            OpKind::Equal => unchanged_lines += op.lines.len(),
            OpKind::Insert => added_lines += op.lines.len(),
            OpKind::Delete => removed_lines += op.lines.len(),
        }
    }

    LineDiff {
        operations,
        added_lines,
        removed_lines,
        unchanged_lines,
    }
}
