use folio_ancestry::AncestryError;
use folio_store::StoreError;
use folio_types::{ArtifactId, TypeError};
use thiserror::Error;

/// Errors produced by coordinator operations.
///
/// Merge conflicts are *not* errors — they are a first-class
/// [`MergeOutcome`] requiring a caller decision. Everything here is local
/// and recoverable by retrying with corrected input; storage failures
/// surface through the wrapped [`StoreError`] variants.
///
/// [`MergeOutcome`]: crate::MergeOutcome
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source and target branch are the same. Rejected before any storage
    /// access.
    #[error("cannot merge branch {0:?} into itself")]
    SelfMerge(String),

    /// The two branch histories share no root.
    #[error("no common ancestor between {src:?} and {target:?}")]
    NoCommonAncestor { src: String, target: String },

    /// Reserved branches cannot be deleted.
    #[error("branch {0:?} is reserved and cannot be deleted")]
    ReservedBranch(String),

    /// A named branch has no visible head for the artifact.
    #[error("branch {branch:?} not found for artifact {artifact}")]
    BranchNotFound { artifact: ArtifactId, branch: String },

    /// Branch name validation failed. Rejected before any storage access.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ancestry(#[from] AncestryError),
}

/// Convenience alias for coordinator results.
pub type EngineResult<T> = Result<T, EngineError>;
