use folio_types::{is_reserved_branch, ArtifactId, VersionId, VersionMetadata};
use serde::{Deserialize, Serialize};

/// Request to create the very first version of an artifact's `main` branch.
#[derive(Clone, Debug)]
pub struct RootVersionSpec {
    pub artifact_id: ArtifactId,
    pub content: String,
    pub actor: String,
    pub description: Option<String>,
}

/// Request to open a new branch from an existing version.
///
/// The new branch starts at `version_number = 1` with the source version's
/// content copied verbatim and its hash recomputed.
#[derive(Clone, Debug)]
pub struct BranchSpec {
    pub artifact_id: ArtifactId,
    pub name: String,
    pub from_version: VersionId,
    pub actor: String,
}

/// Request to append a version to an existing branch.
///
/// `parent` is the version the new snapshot derives from — for a direct
/// commit that is the branch head, for a fast-forward merge it is the source
/// branch head. `expected_head` is the optimistic concurrency token: when
/// set, the append fails with [`StaleHead`] unless the branch head still
/// matches at write time.
///
/// [`StaleHead`]: crate::StoreError::StaleHead
#[derive(Clone, Debug)]
pub struct AppendSpec {
    pub artifact_id: ArtifactId,
    pub branch: String,
    pub content: String,
    pub parent: VersionId,
    pub expected_head: Option<VersionId>,
    pub actor: String,
    pub description: Option<String>,
    pub metadata: VersionMetadata,
}

/// Derived branch view: branches are not stored entities, a branch is the
/// set of versions carrying its label and its head is the one with the
/// maximum version number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub name: String,
    pub head_version_id: VersionId,
    pub head_version_number: u64,
    pub is_reserved: bool,
}

impl BranchSummary {
    /// Build a summary from a branch head.
    pub fn from_head(name: &str, head_id: VersionId, head_number: u64) -> Self {
        Self {
            name: name.to_string(),
            head_version_id: head_id,
            head_version_number: head_number,
            is_reserved: is_reserved_branch(name),
        }
    }
}
