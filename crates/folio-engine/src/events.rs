//! Structured audit events emitted by the coordinator.
//!
//! The engine calls an [`AuditSink`] for every branch lifecycle operation;
//! how events are persisted (hash-chaining, dashboards) belongs to the
//! surrounding product, not this crate.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_types::ArtifactId;

/// Classification of audit events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventKind {
    /// A branch was opened from an existing version.
    BranchCreated,
    /// A merge produced a fast-forward or three-way version.
    BranchMerged,
    /// A branch was logically deleted.
    BranchDeleted,
    /// A version was committed outside a merge (root, direct, rollback).
    VersionCommitted,
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BranchCreated => "BRANCH_CREATED",
            Self::BranchMerged => "BRANCH_MERGED",
            Self::BranchDeleted => "BRANCH_DELETED",
            Self::VersionCommitted => "VERSION_COMMITTED",
        };
        write!(f, "{s}")
    }
}

/// One structured audit event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub kind: AuditEventKind,
    pub artifact_id: ArtifactId,
    pub branch: String,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
    /// Free-form event context (version ids, merge strategy, ...).
    pub details: BTreeMap<String, Value>,
}

impl AuditEvent {
    /// Build an event stamped with the current time.
    pub fn new(
        kind: AuditEventKind,
        artifact_id: ArtifactId,
        branch: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            artifact_id,
            branch: branch.into(),
            actor: actor.into(),
            recorded_at: Utc::now(),
            details: BTreeMap::new(),
        }
    }

    /// Attach one context field, consuming and returning `self`.
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

/// Destination for audit events.
///
/// Implementations must be thread-safe; recording must never fail the
/// operation that produced the event.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Sink that drops every event. For embedding without an audit pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Sink that buffers events in memory. For tests and local inspection.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().expect("lock poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.write().expect("lock poisoned").push(event);
    }
}
