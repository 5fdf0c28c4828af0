use folio_types::{ArtifactId, VersionId};
use thiserror::Error;

/// Errors produced by version storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact is registered under the given id.
    #[error("artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    /// A version lookup missed, or the version belongs to another artifact.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    /// The artifact id is already registered.
    #[error("artifact already registered: {0}")]
    ArtifactAlreadyExists(ArtifactId),

    /// The artifact already has a root version on `main`.
    #[error("artifact {0} already has a root version")]
    AlreadyInitialized(ArtifactId),

    /// A version with this `(artifact, branch)` pair already exists.
    #[error("branch {branch:?} already exists for artifact {artifact}")]
    BranchAlreadyExists { artifact: ArtifactId, branch: String },

    /// The branch has no head (never created, or logically deleted).
    #[error("branch {branch:?} not found for artifact {artifact}")]
    BranchNotFound { artifact: ArtifactId, branch: String },

    /// The branch head moved between the caller's read and this write.
    ///
    /// Lost-update protection: without this check two concurrent merges
    /// could both observe the same head and both append `head + 1`.
    #[error("stale head on branch {branch:?}: expected {expected:?}, found {actual:?}")]
    StaleHead {
        branch: String,
        expected: Option<VersionId>,
        actual: Option<VersionId>,
    },

    /// Stored digest no longer matches stored content.
    #[error("corrupt version {0}: content hash mismatch")]
    Corrupt(VersionId),

    /// Infrastructure failure in the storage backend (I/O, transaction
    /// timeout). Distinct from domain errors; retried at the transport
    /// layer, never swallowed here.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
