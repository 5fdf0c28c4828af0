use std::collections::HashSet;

use tracing::debug;

use folio_store::VersionStore;
use folio_types::VersionId;

use crate::error::{AncestryError, AncestryResult};

/// Upper bound on parent-chain traversal.
///
/// The documented contract is depth-unlimited for well-formed histories, and
/// real manuscript histories never come close to this. Hitting the bound
/// means the version table is corrupt, so the walk turns into a detectable
/// error instead of an unbounded loop.
pub const MAX_WALK_DEPTH: usize = 1_000_000;

/// Find the lowest common ancestor of two versions.
///
/// Walks the parent chain from `a`, recording every visited id, then walks
/// the chain from `b`; the first id already seen is the LCA. Returns
/// `Ok(None)` when the two histories share no root — a distinct outcome the
/// caller must handle, not a failure. `find_common_ancestor(v, v)` is `v`.
///
/// Complexity is `O(depth_a + depth_b)`.
pub fn find_common_ancestor<S>(
    store: &S,
    a: &VersionId,
    b: &VersionId,
) -> AncestryResult<Option<VersionId>>
where
    S: VersionStore + ?Sized,
{
    let mut seen = HashSet::new();
    let mut cursor = Some(*a);
    let mut steps = 0usize;
    while let Some(id) = cursor {
        check_budget(&mut steps)?;
        if !seen.insert(id) {
            return Err(AncestryError::ParentCycle(id));
        }
        cursor = parent_of(store, &id)?;
    }

    let mut visited = HashSet::new();
    let mut cursor = Some(*b);
    let mut steps = 0usize;
    while let Some(id) = cursor {
        check_budget(&mut steps)?;
        if seen.contains(&id) {
            debug!(ancestor = %id, "resolved common ancestor");
            return Ok(Some(id));
        }
        if !visited.insert(id) {
            return Err(AncestryError::ParentCycle(id));
        }
        cursor = parent_of(store, &id)?;
    }

    debug!(a = %a, b = %b, "histories share no common root");
    Ok(None)
}

/// The full parent chain from a version to its root, starting with the
/// version itself.
pub fn parent_chain<S>(store: &S, from: &VersionId) -> AncestryResult<Vec<VersionId>>
where
    S: VersionStore + ?Sized,
{
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = Some(*from);
    let mut steps = 0usize;
    while let Some(id) = cursor {
        check_budget(&mut steps)?;
        if !seen.insert(id) {
            return Err(AncestryError::ParentCycle(id));
        }
        chain.push(id);
        cursor = parent_of(store, &id)?;
    }
    Ok(chain)
}

fn check_budget(steps: &mut usize) -> AncestryResult<()> {
    *steps += 1;
    if *steps > MAX_WALK_DEPTH {
        return Err(AncestryError::WalkBudgetExceeded {
            limit: MAX_WALK_DEPTH,
        });
    }
    Ok(())
}

fn parent_of<S>(store: &S, id: &VersionId) -> AncestryResult<Option<VersionId>>
where
    S: VersionStore + ?Sized,
{
    let version = store
        .get_version(id)?
        .ok_or(AncestryError::VersionNotFound(*id))?;
    Ok(version.parent_version_id)
}
