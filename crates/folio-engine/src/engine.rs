//! The merge coordinator and branch lifecycle facade.

use serde_json::Value;
use tracing::info;

use folio_ancestry::find_common_ancestor;
use folio_diff::compute_line_diff;
use folio_store::{
    AppendSpec, BranchSpec, BranchSummary, RootVersionSpec, StoreError, VersionStore,
};
use folio_types::{
    is_reserved_branch, validate_branch_name, Artifact, ArtifactId, Version, VersionId,
    VersionMetadata, DEFAULT_BRANCH,
};

use crate::conflict::detect_conflicts;
use crate::error::{EngineError, EngineResult};
use crate::events::{AuditEvent, AuditEventKind, AuditSink};
use crate::outcome::{ConflictReport, MergeOutcome};

/// Coordinator over a [`VersionStore`] and an [`AuditSink`].
///
/// Every operation executes as one synchronous unit of work against the
/// store; writes carry the branch head observed during the decision as an
/// optimistic concurrency token, so a head that moved underneath a merge
/// surfaces as [`StoreError::StaleHead`] for the transport layer to retry.
pub struct VersionControl<S, A> {
    store: S,
    audit: A,
}

impl<S, A> VersionControl<S, A>
where
    S: VersionStore,
    A: AuditSink,
{
    /// Build a coordinator over the given store and audit sink.
    pub fn new(store: S, audit: A) -> Self {
        Self { store, audit }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The audit sink.
    pub fn audit(&self) -> &A {
        &self.audit
    }

    // ---- Artifact lifecycle ----

    /// Register an artifact and commit the root version of its `main`
    /// branch in one step.
    pub fn create_artifact(
        &self,
        title: &str,
        content: &str,
        actor: &str,
    ) -> EngineResult<(Artifact, Version)> {
        let mut artifact = Artifact::new(title);
        self.store.register_artifact(&artifact)?;
        let root = self.store.create_root_version(&RootVersionSpec {
            artifact_id: artifact.id,
            content: content.to_string(),
            actor: actor.to_string(),
            description: Some("Initial version".to_string()),
        })?;
        self.store.set_current_version(&artifact.id, &root.id)?;
        artifact.current_version_id = Some(root.id);

        info!(artifact = %artifact.id, "created artifact with root version");
        self.audit.record(
            AuditEvent::new(
                AuditEventKind::VersionCommitted,
                artifact.id,
                DEFAULT_BRANCH,
                actor,
            )
            .with_detail("version_id", Value::from(root.id.to_string())),
        );
        Ok((artifact, root))
    }

    // ---- Commits ----

    /// Commit a new snapshot on an existing branch.
    pub fn commit(
        &self,
        artifact: &ArtifactId,
        branch: &str,
        content: &str,
        actor: &str,
        description: Option<&str>,
    ) -> EngineResult<Version> {
        let head = self.require_head(artifact, branch)?;
        let version = self.store.append_version(&AppendSpec {
            artifact_id: *artifact,
            branch: branch.to_string(),
            content: content.to_string(),
            parent: head.id,
            expected_head: Some(head.id),
            actor: actor.to_string(),
            description: description.map(str::to_string),
            metadata: VersionMetadata::empty(),
        })?;
        self.advance_current_pointer(artifact, branch, &version)?;

        self.audit.record(
            AuditEvent::new(AuditEventKind::VersionCommitted, *artifact, branch, actor)
                .with_detail("version_id", Value::from(version.id.to_string())),
        );
        Ok(version)
    }

    /// Restore an earlier snapshot's content as a new version on the
    /// branch. History is never rewritten: the rollback is one more commit.
    pub fn rollback(
        &self,
        artifact: &ArtifactId,
        branch: &str,
        to_version: &VersionId,
        actor: &str,
    ) -> EngineResult<Version> {
        let head = self.require_head(artifact, branch)?;
        let restored = self
            .store
            .get_version(to_version)?
            .filter(|v| v.artifact_id == *artifact)
            .ok_or(StoreError::VersionNotFound(*to_version))?;

        let version = self.store.append_version(&AppendSpec {
            artifact_id: *artifact,
            branch: branch.to_string(),
            content: restored.content.clone(),
            parent: head.id,
            expected_head: Some(head.id),
            actor: actor.to_string(),
            description: Some(format!(
                "Rolled back to version {}",
                restored.version_number
            )),
            metadata: VersionMetadata::empty()
                .with_extra("rollback_of", Value::from(restored.id.to_string())),
        })?;
        self.advance_current_pointer(artifact, branch, &version)?;

        info!(
            artifact = %artifact,
            branch = %branch,
            restored = %restored.id,
            "rolled back branch"
        );
        self.audit.record(
            AuditEvent::new(AuditEventKind::VersionCommitted, *artifact, branch, actor)
                .with_detail("version_id", Value::from(version.id.to_string()))
                .with_detail("rollback_of", Value::from(restored.id.to_string())),
        );
        Ok(version)
    }

    // ---- Branch lifecycle ----

    /// Open a new branch from an existing version.
    pub fn create_branch(
        &self,
        artifact: &ArtifactId,
        name: &str,
        from_version: &VersionId,
        actor: &str,
    ) -> EngineResult<Version> {
        validate_branch_name(name)?;
        let version = self.store.create_branch(&BranchSpec {
            artifact_id: *artifact,
            name: name.to_string(),
            from_version: *from_version,
            actor: actor.to_string(),
        })?;

        info!(artifact = %artifact, branch = %name, "created branch");
        self.audit.record(
            AuditEvent::new(AuditEventKind::BranchCreated, *artifact, name, actor)
                .with_detail("branched_from", Value::from(from_version.to_string()))
                .with_detail("head_version_id", Value::from(version.id.to_string())),
        );
        Ok(version)
    }

    /// Derived branch views for an artifact.
    pub fn list_branches(&self, artifact: &ArtifactId) -> EngineResult<Vec<BranchSummary>> {
        Ok(self.store.list_branches(artifact)?)
    }

    /// Full commit sequence of a branch, ascending by version number.
    pub fn history(&self, artifact: &ArtifactId, branch: &str) -> EngineResult<Vec<Version>> {
        Ok(self.store.branch_history(artifact, branch)?)
    }

    /// Logically delete a branch.
    ///
    /// Reserved branches (`main`, `rebuttal`, `camera-ready`) are protected
    /// by naming convention. Version rows survive deletion.
    pub fn delete_branch(
        &self,
        artifact: &ArtifactId,
        name: &str,
        actor: &str,
    ) -> EngineResult<()> {
        if is_reserved_branch(name) {
            return Err(EngineError::ReservedBranch(name.to_string()));
        }
        if !self.store.delete_branch(artifact, name)? {
            return Err(EngineError::BranchNotFound {
                artifact: *artifact,
                branch: name.to_string(),
            });
        }

        info!(artifact = %artifact, branch = %name, "deleted branch");
        self.audit.record(AuditEvent::new(
            AuditEventKind::BranchDeleted,
            *artifact,
            name,
            actor,
        ));
        Ok(())
    }

    // ---- Merging ----

    /// Merge `source_branch` into `target_branch`.
    ///
    /// Picks one of four terminal outcomes from how the heads relate to
    /// their lowest common ancestor:
    ///
    /// - source head == LCA: [`MergeOutcome::UpToDate`], nothing written.
    /// - target head == LCA: [`MergeOutcome::FastForward`] — the target
    ///   adopts the source snapshot without diffing.
    /// - both diverged, overlapping edits: [`MergeOutcome::Conflict`],
    ///   nothing written.
    /// - both diverged, disjoint edits: [`MergeOutcome::Merged`] — a
    ///   simplified three-way merge. The new target version's content is
    ///   the source head's snapshot taken wholesale; non-conflicting
    ///   target-only hunks are NOT interleaved into the result. Merge
    ///   lineage (base and second parent) is recorded in the version
    ///   metadata.
    pub fn merge(
        &self,
        artifact: &ArtifactId,
        source_branch: &str,
        target_branch: &str,
        message: Option<&str>,
        actor: &str,
    ) -> EngineResult<MergeOutcome> {
        if source_branch == target_branch {
            return Err(EngineError::SelfMerge(source_branch.to_string()));
        }

        let source_head = self.require_head(artifact, source_branch)?;
        let target_head = self.require_head(artifact, target_branch)?;

        let lca = find_common_ancestor(&self.store, &source_head.id, &target_head.id)?
            .ok_or_else(|| EngineError::NoCommonAncestor {
                src: source_branch.to_string(),
                target: target_branch.to_string(),
            })?;

        if source_head.id == lca {
            info!(
                artifact = %artifact,
                source = %source_branch,
                target = %target_branch,
                "target already contains source"
            );
            return Ok(MergeOutcome::UpToDate);
        }

        if target_head.id == lca {
            return self.fast_forward(
                artifact,
                source_branch,
                target_branch,
                &source_head,
                &target_head,
                message,
                actor,
            );
        }

        let base = self
            .store
            .get_version(&lca)?
            .ok_or(StoreError::VersionNotFound(lca))?;
        let base_to_source = compute_line_diff(&base.content, &source_head.content);
        let base_to_target = compute_line_diff(&base.content, &target_head.content);

        let conflicts = detect_conflicts(&base_to_source, &base_to_target);
        if !conflicts.is_empty() {
            info!(
                artifact = %artifact,
                source = %source_branch,
                target = %target_branch,
                conflicts = conflicts.len(),
                "merge blocked by overlapping edits"
            );
            return Ok(MergeOutcome::Conflict(ConflictReport {
                conflicts,
                merge_base: lca,
                source_stats: base_to_source.stats(),
                target_stats: base_to_target.stats(),
            }));
        }

        let description = message.map(str::to_string).unwrap_or_else(|| {
            format!("Merged {source_branch} into {target_branch}")
        });
        let version = self.store.append_version(&AppendSpec {
            artifact_id: *artifact,
            branch: target_branch.to_string(),
            content: source_head.content.clone(),
            parent: target_head.id,
            expected_head: Some(target_head.id),
            actor: actor.to_string(),
            description: Some(description),
            metadata: VersionMetadata::merged(lca, source_head.id),
        })?;
        self.advance_current_pointer(artifact, target_branch, &version)?;

        info!(
            artifact = %artifact,
            source = %source_branch,
            target = %target_branch,
            new_version = %version.id,
            "three-way merge committed"
        );
        self.audit.record(
            AuditEvent::new(AuditEventKind::BranchMerged, *artifact, target_branch, actor)
                .with_detail("source_branch", Value::from(source_branch))
                .with_detail("strategy", Value::from("three_way"))
                .with_detail("merge_base", Value::from(lca.to_string()))
                .with_detail("new_version_id", Value::from(version.id.to_string())),
        );
        Ok(MergeOutcome::Merged {
            new_version_id: version.id,
            new_version_number: version.version_number,
            merge_base: lca,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn fast_forward(
        &self,
        artifact: &ArtifactId,
        source_branch: &str,
        target_branch: &str,
        source_head: &Version,
        target_head: &Version,
        message: Option<&str>,
        actor: &str,
    ) -> EngineResult<MergeOutcome> {
        let description = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Fast-forward from {source_branch}"));
        let version = self.store.append_version(&AppendSpec {
            artifact_id: *artifact,
            branch: target_branch.to_string(),
            content: source_head.content.clone(),
            parent: source_head.id,
            expected_head: Some(target_head.id),
            actor: actor.to_string(),
            description: Some(description),
            metadata: VersionMetadata::empty(),
        })?;
        self.advance_current_pointer(artifact, target_branch, &version)?;

        info!(
            artifact = %artifact,
            source = %source_branch,
            target = %target_branch,
            new_version = %version.id,
            "fast-forward merge committed"
        );
        self.audit.record(
            AuditEvent::new(AuditEventKind::BranchMerged, *artifact, target_branch, actor)
                .with_detail("source_branch", Value::from(source_branch))
                .with_detail("strategy", Value::from("fast_forward"))
                .with_detail("new_version_id", Value::from(version.id.to_string())),
        );
        Ok(MergeOutcome::FastForward {
            new_version_id: version.id,
            new_version_number: version.version_number,
        })
    }

    // ---- Internals ----

    fn require_head(&self, artifact: &ArtifactId, branch: &str) -> EngineResult<Version> {
        self.store
            .head(artifact, branch)?
            .ok_or_else(|| EngineError::BranchNotFound {
                artifact: *artifact,
                branch: branch.to_string(),
            })
    }

    /// When the written branch is the artifact's designated current branch,
    /// move the current-version pointer to the new head.
    fn advance_current_pointer(
        &self,
        artifact: &ArtifactId,
        branch: &str,
        version: &Version,
    ) -> EngineResult<()> {
        let entry = self
            .store
            .get_artifact(artifact)?
            .ok_or(StoreError::ArtifactNotFound(*artifact))?;
        if entry.current_branch == branch {
            self.store.set_current_version(artifact, &version.id)?;
        }
        Ok(())
    }
}

impl<S, A> std::fmt::Debug for VersionControl<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionControl").finish_non_exhaustive()
    }
}
