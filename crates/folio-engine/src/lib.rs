//! Merge coordination and branch lifecycle for the Folio manuscript
//! version-control engine.
//!
//! [`VersionControl`] is the boundary facade the rest of the product talks
//! to: branch creation and deletion, direct commits, rollbacks, and merges.
//! Merging selects between four terminal outcomes — up-to-date,
//! fast-forward, conflict, and three-way merge — based on how the two
//! branch heads relate to their common ancestor.
//!
//! # Key Types
//!
//! - [`VersionControl`] — The coordinator over a [`VersionStore`] and an [`AuditSink`]
//! - [`MergeOutcome`] / [`ConflictReport`] — Terminal merge results
//! - [`MergeConflict`] / [`LineRange`] — Overlapping-edit reports
//! - [`AuditEvent`] / [`AuditSink`] — Structured lifecycle events
//!
//! [`VersionStore`]: folio_store::VersionStore

pub mod conflict;
pub mod engine;
pub mod error;
pub mod events;
pub mod outcome;

pub use conflict::{detect_conflicts, LineRange, MergeConflict};
pub use engine::VersionControl;
pub use error::{EngineError, EngineResult};
pub use events::{AuditEvent, AuditEventKind, AuditSink, InMemoryAuditSink, NullAuditSink};
pub use outcome::{ConflictReport, MergeOutcome};
