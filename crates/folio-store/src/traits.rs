use folio_types::{Artifact, ArtifactId, Version, VersionId};

use crate::error::StoreResult;
use crate::records::{AppendSpec, BranchSpec, BranchSummary, RootVersionSpec};

/// Durable, append-only storage for manuscript versions.
///
/// All implementations must satisfy these invariants:
/// - Versions are immutable once written and never physically deleted;
///   deleting a branch only stops exposing its head.
/// - `version_number` is unique and increasing along any single branch.
/// - Each write request executes as one transactional unit: the head read
///   that assigns the next version number and the insert are never
///   interleaved with another writer on the same branch.
/// - `create_branch` and `append_version` honor their respective uniqueness
///   and expected-head checks atomically with the insert.
/// - Stored `content_hash` always equals the digest of stored content; a
///   mismatch surfaces as [`Corrupt`], never as a silent read.
/// - Infrastructure failures are propagated, never swallowed.
///
/// [`Corrupt`]: crate::StoreError::Corrupt
pub trait VersionStore: Send + Sync {
    /// Register a new artifact. Fails with `ArtifactAlreadyExists` when the
    /// id is taken.
    fn register_artifact(&self, artifact: &Artifact) -> StoreResult<()>;

    /// Look up an artifact's registry entry.
    ///
    /// Returns `Ok(None)` if the artifact is not registered.
    fn get_artifact(&self, id: &ArtifactId) -> StoreResult<Option<Artifact>>;

    /// Move the artifact's current-version pointer.
    ///
    /// The version must exist and belong to the artifact.
    fn set_current_version(&self, artifact: &ArtifactId, version: &VersionId) -> StoreResult<()>;

    /// Read one version row, verifying content integrity.
    ///
    /// Returns `Ok(None)` if no such version exists. Versions on logically
    /// deleted branches remain readable here — deletion never erases rows.
    fn get_version(&self, id: &VersionId) -> StoreResult<Option<Version>>;

    /// Insert the first version of the artifact's `main` branch
    /// (`version_number = 1`, no parent).
    fn create_root_version(&self, spec: &RootVersionSpec) -> StoreResult<Version>;

    /// Open a new branch: insert `version_number = 1` with the source
    /// version's content copied verbatim and the hash recomputed.
    ///
    /// Fails with `BranchAlreadyExists` when any version carries the
    /// `(artifact, branch)` pair, and with `VersionNotFound` when
    /// `from_version` is missing or belongs to a different artifact.
    fn create_branch(&self, spec: &BranchSpec) -> StoreResult<Version>;

    /// Append to an existing branch with `version_number = head + 1`.
    ///
    /// Fails with `BranchNotFound` when the branch has no head — there is no
    /// implicit branch creation. When `expected_head` is set, fails with
    /// `StaleHead` if the head no longer matches at write time.
    fn append_version(&self, spec: &AppendSpec) -> StoreResult<Version>;

    /// The version with the maximum `version_number` for the branch label,
    /// or `None` when the branch does not exist or was deleted.
    fn head(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<Option<Version>>;

    /// Derived branch views for an artifact, sorted by name. Deleted
    /// branches are not listed.
    fn list_branches(&self, artifact: &ArtifactId) -> StoreResult<Vec<BranchSummary>>;

    /// Full commit sequence of a branch, ascending by version number.
    ///
    /// History stays readable for logically deleted branches.
    fn branch_history(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<Vec<Version>>;

    /// Logically delete a branch: stop exposing its head without erasing
    /// version rows. Returns `true` if the branch was visible before.
    fn delete_branch(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<bool>;
}
