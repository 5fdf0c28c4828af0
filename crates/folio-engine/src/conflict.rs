//! Overlap-based conflict detection between two diffs off a shared base.
//!
//! Both diffs must be computed against the same base snapshot. Each side's
//! edits are reduced to the half-open base-line ranges it deleted; two
//! ranges conflict iff they overlap. Pure insertions carry no deleted range
//! and therefore never conflict.

use folio_diff::{LineDiff, OpKind};
use serde::{Deserialize, Serialize};

/// Half-open range `[start, end)` of zero-based base line indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Number of base lines covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers no lines.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open interval overlap test.
    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One pair of overlapping edits between the two sides of a merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    /// Base lines the source branch changed.
    pub source_range: LineRange,
    /// Base lines the target branch changed.
    pub target_range: LineRange,
    /// Human-readable summary of the overlap.
    pub description: String,
}

/// Report every overlapping pair of edited base ranges between two diffs.
///
/// Pairs are reported independently: adjacent or nested overlaps are NOT
/// merged or deduplicated, so callers can rely on raw pairwise overlap
/// counts. An empty result means the two sides touched disjoint base lines.
pub fn detect_conflicts(
    base_to_source: &LineDiff,
    base_to_target: &LineDiff,
) -> Vec<MergeConflict> {
    let source_ranges = edited_base_ranges(base_to_source);
    let target_ranges = edited_base_ranges(base_to_target);

    let mut conflicts = Vec::new();
    for source in &source_ranges {
        for target in &target_ranges {
            if source.overlaps(target) {
                let from = source.start.max(target.start);
                let to = source.end.min(target.end);
                conflicts.push(MergeConflict {
                    source_range: *source,
                    target_range: *target,
                    description: format!(
                        "both branches edited base lines {}-{}",
                        from + 1,
                        to
                    ),
                });
            }
        }
    }
    conflicts
}

/// Base-line ranges one diff deleted (i.e. changed) relative to the base.
///
/// The base cursor advances over `Equal` and `Delete` runs; `Insert` runs
/// consume no base lines.
fn edited_base_ranges(diff: &LineDiff) -> Vec<LineRange> {
    let mut ranges = Vec::new();
    let mut base_line = 0usize;
    for op in &diff.operations {
        match op.kind {
            OpKind::Equal => base_line += op.lines.len(),
            OpKind::Delete => {
                ranges.push(LineRange {
                    start: base_line,
                    end: base_line + op.lines.len(),
                });
                base_line += op.lines.len();
            }
            OpKind::Insert => {}
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_diff::compute_line_diff;

    const BASE: &str = "A\nB\nC\nD\n";

    // -----------------------------------------------------------------------
    // Range arithmetic
    // -----------------------------------------------------------------------

    #[test]
    fn overlap_is_half_open() {
        let a = LineRange { start: 0, end: 2 };
        let b = LineRange { start: 2, end: 4 };
        assert!(!a.overlaps(&b), "touching ranges do not overlap");

        let c = LineRange { start: 1, end: 3 };
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn empty_range_never_overlaps() {
        let empty = LineRange { start: 2, end: 2 };
        let wide = LineRange { start: 0, end: 10 };
        assert!(!empty.overlaps(&wide));
        assert!(!wide.overlaps(&empty));
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }

    // -----------------------------------------------------------------------
    // Edited range reconstruction
    // -----------------------------------------------------------------------

    #[test]
    fn edit_of_one_line_yields_one_range() {
        let diff = compute_line_diff(BASE, "A\nX\nC\nD\n");
        let ranges = edited_base_ranges(&diff);
        assert_eq!(ranges, vec![LineRange { start: 1, end: 2 }]);
    }

    #[test]
    fn pure_insert_yields_no_ranges() {
        let diff = compute_line_diff(BASE, "A\nB\nB2\nC\nD\n");
        assert!(edited_base_ranges(&diff).is_empty());
    }

    #[test]
    fn insert_does_not_shift_base_cursor() {
        // Inserting above an edit must not move the edit's base range.
        let diff = compute_line_diff(BASE, "NEW\nA\nB\nX\nD\n");
        let ranges = edited_base_ranges(&diff);
        assert_eq!(ranges, vec![LineRange { start: 2, end: 3 }]);
    }

    // -----------------------------------------------------------------------
    // Conflict detection
    // -----------------------------------------------------------------------

    #[test]
    fn disjoint_edits_do_not_conflict() {
        let source = compute_line_diff(BASE, "A\nX\nC\nD\n"); // line 2
        let target = compute_line_diff(BASE, "A\nB\nY\nD\n"); // line 3
        assert!(detect_conflicts(&source, &target).is_empty());
    }

    #[test]
    fn same_line_edits_conflict() {
        let source = compute_line_diff(BASE, "A\nX\nC\nD\n");
        let target = compute_line_diff(BASE, "A\nY\nC\nD\n");
        let conflicts = detect_conflicts(&source, &target);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].source_range.overlaps(&conflicts[0].target_range));
        assert_eq!(conflicts[0].source_range, LineRange { start: 1, end: 2 });
    }

    #[test]
    fn nested_deletion_conflicts_with_inner_edit() {
        let source = compute_line_diff(BASE, "A\nD\n"); // deletes B, C
        let target = compute_line_diff(BASE, "A\nB\nY\nD\n"); // edits C
        let conflicts = detect_conflicts(&source, &target);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source_range, LineRange { start: 1, end: 3 });
        assert_eq!(conflicts[0].target_range, LineRange { start: 2, end: 3 });
    }

    #[test]
    fn every_overlapping_pair_is_reported() {
        // Source deletes the whole body in one run; the target edits two
        // separate lines. Two overlapping pairs, reported independently.
        let source = compute_line_diff(BASE, "");
        let target = compute_line_diff(BASE, "A\nX\nC\nY\n");
        let conflicts = detect_conflicts(&source, &target);
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn insert_only_branches_never_conflict() {
        let source = compute_line_diff(BASE, "A\nB\nC\nD\nE\n");
        let target = compute_line_diff(BASE, "NEW\nA\nB\nC\nD\n");
        assert!(detect_conflicts(&source, &target).is_empty());
    }

    #[test]
    fn description_names_one_based_lines() {
        let source = compute_line_diff(BASE, "A\nX\nC\nD\n");
        let target = compute_line_diff(BASE, "A\nY\nC\nD\n");
        let conflicts = detect_conflicts(&source, &target);
        assert_eq!(conflicts[0].description, "both branches edited base lines 2-2");
    }
}
