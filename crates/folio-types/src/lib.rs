//! Foundation types for the Folio manuscript version-control engine.
//!
//! This crate provides the identifier, hashing, and record types used
//! throughout the Folio system. Every other Folio crate depends on
//! `folio-types`.
//!
//! # Key Types
//!
//! - [`ArtifactId`] / [`VersionId`] — UUID v7 identifiers for manuscripts and snapshots
//! - [`ContentHash`] — BLAKE3 digest of a snapshot's full text, used for integrity checks
//! - [`Version`] — One immutable full-text snapshot on a named branch
//! - [`VersionMetadata`] / [`MergeProvenance`] — Descriptive and merge-lineage metadata
//! - [`Artifact`] — Registry entry carrying the current branch and version pointer

pub mod error;
pub mod hash;
pub mod id;
pub mod names;
pub mod version;

pub use error::TypeError;
pub use hash::ContentHash;
pub use id::{ArtifactId, VersionId};
pub use names::{is_reserved_branch, validate_branch_name, DEFAULT_BRANCH, RESERVED_BRANCHES};
pub use version::{Artifact, MergeProvenance, Version, VersionMetadata};
