use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hash::ContentHash;
use crate::id::{ArtifactId, VersionId};
use crate::names::DEFAULT_BRANCH;

/// One immutable full-text snapshot of a manuscript on a named branch.
///
/// A version is created exactly once (root commit, branch creation, direct
/// commit, rollback, or merge) and never mutated or physically deleted.
/// `version_number` is monotonically increasing within a branch, starting at
/// 1 for the branch's first version; it is *not* globally unique across
/// branches of the same artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Opaque unique identifier.
    pub id: VersionId,
    /// The manuscript this snapshot belongs to.
    pub artifact_id: ArtifactId,
    /// Position on this branch's commit sequence, starting at 1.
    pub version_number: u64,
    /// Full text snapshot.
    pub content: String,
    /// BLAKE3 digest of `content`. Integrity only, never identity.
    pub content_hash: ContentHash,
    /// Branch label this version was committed on.
    pub branch: String,
    /// The version this one was derived from. `None` only for the very
    /// first version of an artifact's `main` branch.
    pub parent_version_id: Option<VersionId>,
    /// Free-text summary of the change.
    pub change_description: Option<String>,
    /// Who committed the version.
    pub changed_by: String,
    /// When the version was committed.
    pub created_at: DateTime<Utc>,
    /// Descriptive, non-semantic metadata.
    pub metadata: VersionMetadata,
}

impl Version {
    /// Returns `true` if this is the root of the artifact's history.
    pub fn is_root(&self) -> bool {
        self.parent_version_id.is_none()
    }

    /// Returns `true` if this version was produced by a three-way merge.
    pub fn is_merge(&self) -> bool {
        self.metadata.merge.is_some()
    }

    /// Recompute the digest of `content` and compare to the stored hash.
    ///
    /// A mismatch indicates storage corruption, not a business error.
    pub fn verify_integrity(&self) -> bool {
        self.content_hash.matches(&self.content)
    }
}

/// Descriptive metadata attached to a version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Merge lineage, present only on versions produced by a three-way merge.
    pub merge: Option<MergeProvenance>,
    /// Free-form caller-supplied fields.
    pub extra: BTreeMap<String, Value>,
}

impl VersionMetadata {
    /// Metadata with no merge lineage and no extra fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Metadata recording three-way merge lineage.
    pub fn merged(merge_base: VersionId, second_parent: VersionId) -> Self {
        Self {
            merge: Some(MergeProvenance {
                merge_base,
                second_parent,
            }),
            extra: BTreeMap::new(),
        }
    }

    /// Attach a free-form field, consuming and returning `self`.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Lineage recorded on a version produced by a three-way merge.
///
/// The parent pointer of a merge version is the target branch head; the
/// source head and the common ancestor are kept here so the full merge
/// triangle can be reconstructed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeProvenance {
    /// The common ancestor the two sides diverged from.
    pub merge_base: VersionId,
    /// The source branch head that was merged in.
    pub second_parent: VersionId,
}

/// Registry entry for a manuscript artifact.
///
/// The artifact's `current_branch` designates which branch head the product
/// surfaces as "the" manuscript; `current_version_id` tracks that head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier.
    pub id: ArtifactId,
    /// Human-readable manuscript title.
    pub title: String,
    /// The designated current branch, `main` unless changed.
    pub current_branch: String,
    /// Head of the current branch, `None` until the first version exists.
    pub current_version_id: Option<VersionId>,
}

impl Artifact {
    /// Create a registry entry on the default branch with no versions yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ArtifactId::new(),
            title: title.into(),
            current_branch: DEFAULT_BRANCH.to_string(),
            current_version_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_version(content: &str, parent: Option<VersionId>) -> Version {
        Version {
            id: VersionId::new(),
            artifact_id: ArtifactId::new(),
            version_number: 1,
            content: content.to_string(),
            content_hash: ContentHash::of(content),
            branch: DEFAULT_BRANCH.to_string(),
            parent_version_id: parent,
            change_description: None,
            changed_by: "alice".to_string(),
            created_at: Utc::now(),
            metadata: VersionMetadata::empty(),
        }
    }

    #[test]
    fn root_detection() {
        assert!(make_version("text", None).is_root());
        assert!(!make_version("text", Some(VersionId::new())).is_root());
    }

    #[test]
    fn integrity_holds_for_fresh_version() {
        let version = make_version("Abstract\nBody\n", None);
        assert!(version.verify_integrity());
    }

    #[test]
    fn integrity_fails_on_corruption() {
        let mut version = make_version("pristine", None);
        version.content = "tampered".to_string();
        assert!(!version.verify_integrity());
    }

    #[test]
    fn merge_metadata_marks_merge_versions() {
        let base = VersionId::new();
        let second = VersionId::new();
        let mut version = make_version("merged", Some(VersionId::new()));
        assert!(!version.is_merge());

        version.metadata = VersionMetadata::merged(base, second);
        assert!(version.is_merge());
        let prov = version.metadata.merge.unwrap();
        assert_eq!(prov.merge_base, base);
        assert_eq!(prov.second_parent, second);
    }

    #[test]
    fn metadata_extra_fields() {
        let meta = VersionMetadata::empty()
            .with_extra("review_round", Value::from(2))
            .with_extra("journal", Value::from("Neuro Letters"));
        assert_eq!(meta.extra.len(), 2);
        assert_eq!(meta.extra["review_round"], Value::from(2));
    }

    #[test]
    fn new_artifact_starts_on_main() {
        let artifact = Artifact::new("Deep Oceans Survey");
        assert_eq!(artifact.current_branch, DEFAULT_BRANCH);
        assert!(artifact.current_version_id.is_none());
    }

    #[test]
    fn version_serde_roundtrip() {
        let version = make_version("serde text\n", Some(VersionId::new()));
        let json = serde_json::to_string(&version).unwrap();
        let parsed: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(version, parsed);
    }
}
