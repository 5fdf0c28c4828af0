//! Line-level text diffing for the Folio manuscript version-control engine.
//!
//! Produces a minimal, order-preserving edit script between two full-text
//! snapshots using the `similar` crate (Myers diff algorithm).
//!
//! # Key Types
//!
//! - [`LineDiff`] — Edit script plus added/removed/unchanged line tallies
//! - [`DiffOp`] / [`OpKind`] — One maximal run of equal, inserted, or deleted lines
//! - [`DiffStats`] — Added/removed counts for merge reporting

pub mod line_diff;

pub use line_diff::{compute_line_diff, DiffOp, DiffStats, LineDiff, OpKind};
