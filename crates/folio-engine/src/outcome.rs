//! Terminal merge outcomes.

use folio_diff::DiffStats;
use folio_types::VersionId;
use serde::{Deserialize, Serialize};

use crate::conflict::MergeConflict;

/// Result of a merge request.
///
/// A conflict is a first-class outcome, not an error: the caller decides
/// whether to resolve manually or abandon the merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// The target already contains everything from the source. No version
    /// was created.
    UpToDate,

    /// The target had not diverged from the common ancestor; it adopted the
    /// source head's content directly.
    FastForward {
        new_version_id: VersionId,
        new_version_number: u64,
    },

    /// Both sides diverged without overlapping edits; a merge version was
    /// committed on the target branch.
    Merged {
        new_version_id: VersionId,
        new_version_number: u64,
        merge_base: VersionId,
    },

    /// Overlapping edits were detected. No version was written.
    Conflict(ConflictReport),
}

impl MergeOutcome {
    /// Returns `true` for the conflict outcome.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// The id of the version the merge created, if any.
    pub fn new_version_id(&self) -> Option<VersionId> {
        match self {
            Self::FastForward { new_version_id, .. } | Self::Merged { new_version_id, .. } => {
                Some(*new_version_id)
            }
            Self::UpToDate | Self::Conflict(_) => None,
        }
    }
}

/// Everything a caller needs to act on a conflicted merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Every overlapping pair of edited base ranges, unmerged and
    /// undeduplicated.
    pub conflicts: Vec<MergeConflict>,
    /// The common ancestor both diffs were computed against.
    pub merge_base: VersionId,
    /// Line counts of the base-to-source diff.
    pub source_stats: DiffStats,
    /// Line counts of the base-to-target diff.
    pub target_stats: DiffStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_predicates() {
        let id = VersionId::new();
        let ff = MergeOutcome::FastForward {
            new_version_id: id,
            new_version_number: 4,
        };
        assert!(!ff.is_conflict());
        assert_eq!(ff.new_version_id(), Some(id));

        assert_eq!(MergeOutcome::UpToDate.new_version_id(), None);

        let conflict = MergeOutcome::Conflict(ConflictReport {
            conflicts: Vec::new(),
            merge_base: VersionId::new(),
            source_stats: DiffStats::default(),
            target_stats: DiffStats::default(),
        });
        assert!(conflict.is_conflict());
        assert_eq!(conflict.new_version_id(), None);
    }
}
