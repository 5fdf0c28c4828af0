use folio_store::StoreError;
use folio_types::VersionId;
use thiserror::Error;

/// Errors that can occur while resolving ancestry.
#[derive(Debug, Error)]
pub enum AncestryError {
    /// A version referenced during the walk does not exist.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    /// The same version appeared twice on one parent chain. The chain is
    /// corrupt: well-formed histories are acyclic.
    #[error("parent cycle detected at version {0}")]
    ParentCycle(VersionId),

    /// The walk exceeded the sanity bound without reaching a root.
    #[error("ancestry walk exceeded {limit} steps")]
    WalkBudgetExceeded { limit: usize },

    /// Storage failure during the walk.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for ancestry results.
pub type AncestryResult<T> = Result<T, AncestryError>;
