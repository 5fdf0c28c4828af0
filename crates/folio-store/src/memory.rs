use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use folio_types::{Artifact, ArtifactId, ContentHash, Version, VersionId, VersionMetadata};

use crate::error::{StoreError, StoreResult};
use crate::records::{AppendSpec, BranchSpec, BranchSummary, RootVersionSpec};
use crate::traits::VersionStore;

/// In-memory, HashMap-based version store.
///
/// Intended for tests and embedding. All state lives behind a single
/// `RwLock`, so each write request (the head read that assigns the next
/// version number plus the insert) executes under one write lock — the
/// transactional unit the trait requires.
pub struct InMemoryVersionStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    artifacts: HashMap<ArtifactId, Artifact>,
    versions: HashMap<VersionId, Version>,
    /// `(artifact, branch)` -> version ids in append order (ascending number).
    branches: HashMap<(ArtifactId, String), Vec<VersionId>>,
    /// Logically deleted branches. Rows stay in `versions`.
    deleted: HashSet<(ArtifactId, String)>,
}

impl StoreState {
    fn require_artifact(&self, id: &ArtifactId) -> StoreResult<&Artifact> {
        self.artifacts
            .get(id)
            .ok_or(StoreError::ArtifactNotFound(*id))
    }

    /// Head of a branch, `None` when the branch is absent or deleted.
    fn visible_head(&self, artifact: &ArtifactId, branch: &str) -> Option<&Version> {
        let key = (*artifact, branch.to_string());
        if self.deleted.contains(&key) {
            return None;
        }
        let ids = self.branches.get(&key)?;
        ids.last().and_then(|id| self.versions.get(id))
    }

    fn insert_version(&mut self, version: Version) {
        let key = (version.artifact_id, version.branch.clone());
        self.branches.entry(key).or_default().push(version.id);
        debug!(
            version = %version.id,
            artifact = %version.artifact_id,
            branch = %version.branch,
            number = version.version_number,
            "inserted version"
        );
        self.versions.insert(version.id, version);
    }
}

impl InMemoryVersionStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of version rows currently stored (deleted branches included).
    pub fn version_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").versions.len()
    }

    /// Number of registered artifacts.
    pub fn artifact_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").artifacts.len()
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn verified(version: Version) -> StoreResult<Version> {
    if !version.verify_integrity() {
        return Err(StoreError::Corrupt(version.id));
    }
    Ok(version)
}

impl VersionStore for InMemoryVersionStore {
    fn register_artifact(&self, artifact: &Artifact) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if state.artifacts.contains_key(&artifact.id) {
            return Err(StoreError::ArtifactAlreadyExists(artifact.id));
        }
        debug!(artifact = %artifact.id, title = %artifact.title, "registered artifact");
        state.artifacts.insert(artifact.id, artifact.clone());
        Ok(())
    }

    fn get_artifact(&self, id: &ArtifactId) -> StoreResult<Option<Artifact>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.artifacts.get(id).cloned())
    }

    fn set_current_version(&self, artifact: &ArtifactId, version: &VersionId) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.require_artifact(artifact)?;
        match state.versions.get(version) {
            Some(v) if v.artifact_id == *artifact => {}
            _ => return Err(StoreError::VersionNotFound(*version)),
        }
        let entry = state
            .artifacts
            .get_mut(artifact)
            .ok_or(StoreError::ArtifactNotFound(*artifact))?;
        entry.current_version_id = Some(*version);
        Ok(())
    }

    fn get_version(&self, id: &VersionId) -> StoreResult<Option<Version>> {
        let state = self.inner.read().expect("lock poisoned");
        match state.versions.get(id) {
            Some(version) => Ok(Some(verified(version.clone())?)),
            None => Ok(None),
        }
    }

    fn create_root_version(&self, spec: &RootVersionSpec) -> StoreResult<Version> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.require_artifact(&spec.artifact_id)?;

        let key = (spec.artifact_id, folio_types::DEFAULT_BRANCH.to_string());
        if state.branches.contains_key(&key) {
            return Err(StoreError::AlreadyInitialized(spec.artifact_id));
        }

        let version = Version {
            id: VersionId::new(),
            artifact_id: spec.artifact_id,
            version_number: 1,
            content: spec.content.clone(),
            content_hash: ContentHash::of(&spec.content),
            branch: folio_types::DEFAULT_BRANCH.to_string(),
            parent_version_id: None,
            change_description: spec.description.clone(),
            changed_by: spec.actor.clone(),
            created_at: Utc::now(),
            metadata: VersionMetadata::empty(),
        };
        state.insert_version(version.clone());
        Ok(version)
    }

    fn create_branch(&self, spec: &BranchSpec) -> StoreResult<Version> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.require_artifact(&spec.artifact_id)?;

        // Deleted branches keep their rows, so their names stay taken.
        let key = (spec.artifact_id, spec.name.clone());
        if state.branches.contains_key(&key) {
            return Err(StoreError::BranchAlreadyExists {
                artifact: spec.artifact_id,
                branch: spec.name.clone(),
            });
        }

        let source = match state.versions.get(&spec.from_version) {
            Some(v) if v.artifact_id == spec.artifact_id => v.clone(),
            _ => return Err(StoreError::VersionNotFound(spec.from_version)),
        };

        let version = Version {
            id: VersionId::new(),
            artifact_id: spec.artifact_id,
            version_number: 1,
            content_hash: ContentHash::of(&source.content),
            content: source.content,
            branch: spec.name.clone(),
            parent_version_id: Some(spec.from_version),
            change_description: Some(format!(
                "Created branch {} from version {}",
                spec.name, source.version_number
            )),
            changed_by: spec.actor.clone(),
            created_at: Utc::now(),
            metadata: VersionMetadata::empty(),
        };
        state.insert_version(version.clone());
        Ok(version)
    }

    fn append_version(&self, spec: &AppendSpec) -> StoreResult<Version> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.require_artifact(&spec.artifact_id)?;

        // No implicit branch creation from append.
        let head = state
            .visible_head(&spec.artifact_id, &spec.branch)
            .cloned()
            .ok_or_else(|| StoreError::BranchNotFound {
                artifact: spec.artifact_id,
                branch: spec.branch.clone(),
            })?;

        if let Some(expected) = spec.expected_head {
            if head.id != expected {
                return Err(StoreError::StaleHead {
                    branch: spec.branch.clone(),
                    expected: Some(expected),
                    actual: Some(head.id),
                });
            }
        }

        match state.versions.get(&spec.parent) {
            Some(v) if v.artifact_id == spec.artifact_id => {}
            _ => return Err(StoreError::VersionNotFound(spec.parent)),
        }

        let version = Version {
            id: VersionId::new(),
            artifact_id: spec.artifact_id,
            version_number: head.version_number + 1,
            content: spec.content.clone(),
            content_hash: ContentHash::of(&spec.content),
            branch: spec.branch.clone(),
            parent_version_id: Some(spec.parent),
            change_description: spec.description.clone(),
            changed_by: spec.actor.clone(),
            created_at: Utc::now(),
            metadata: spec.metadata.clone(),
        };
        state.insert_version(version.clone());
        Ok(version)
    }

    fn head(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<Option<Version>> {
        let state = self.inner.read().expect("lock poisoned");
        state.require_artifact(artifact)?;
        match state.visible_head(artifact, branch) {
            Some(version) => Ok(Some(verified(version.clone())?)),
            None => Ok(None),
        }
    }

    fn list_branches(&self, artifact: &ArtifactId) -> StoreResult<Vec<BranchSummary>> {
        let state = self.inner.read().expect("lock poisoned");
        state.require_artifact(artifact)?;

        let mut summaries: Vec<BranchSummary> = state
            .branches
            .keys()
            .filter(|(owner, _)| owner == artifact)
            .filter(|key| !state.deleted.contains(*key))
            .filter_map(|(_, name)| {
                let head = state.visible_head(artifact, name)?;
                Some(BranchSummary::from_head(name, head.id, head.version_number))
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn branch_history(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<Vec<Version>> {
        let state = self.inner.read().expect("lock poisoned");
        state.require_artifact(artifact)?;

        let key = (*artifact, branch.to_string());
        let ids = state
            .branches
            .get(&key)
            .ok_or_else(|| StoreError::BranchNotFound {
                artifact: *artifact,
                branch: branch.to_string(),
            })?;
        ids.iter()
            .map(|id| {
                let version = state
                    .versions
                    .get(id)
                    .cloned()
                    .ok_or(StoreError::VersionNotFound(*id))?;
                verified(version)
            })
            .collect()
    }

    fn delete_branch(&self, artifact: &ArtifactId, branch: &str) -> StoreResult<bool> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.require_artifact(artifact)?;

        let key = (*artifact, branch.to_string());
        if !state.branches.contains_key(&key) || state.deleted.contains(&key) {
            return Ok(false);
        }
        state.deleted.insert(key);
        debug!(artifact = %artifact, branch = %branch, "logically deleted branch");
        Ok(true)
    }
}

impl std::fmt::Debug for InMemoryVersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVersionStore")
            .field("artifact_count", &self.artifact_count())
            .field("version_count", &self.version_count())
            .finish()
    }
}
