use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::BitletError;
use std::collections::BTreeSet;

/// Untracked working files an operation would overwrite.
///
/// A file is untracked when the current branch neither tracks nor stages it.
/// Writing the exact content it already holds is not a conflict.
#[derive(Debug)]
pub struct UntrackedConflicts<'w> {
    workspace: &'w Workspace,
    paths: BTreeSet<String>,
}

impl<'w> UntrackedConflicts<'w> {
    pub fn new(workspace: &'w Workspace) -> Self {
        UntrackedConflicts {
            workspace,
            paths: BTreeSet::new(),
        }
    }

    /// Check one incoming write. `incoming` is `None` when the new content is
    /// not a stored blob (a conflict file), so any existing file is in the way.
    pub fn check(
        &mut self,
        current: &Tree,
        name: &str,
        incoming: Option<&ObjectId>,
    ) -> anyhow::Result<()> {
        if current.is_tracked(name) || current.is_staged(name) || !self.workspace.exists(name) {
            return Ok(());
        }

        if let Some(oid) = incoming
            && self.workspace.blob_oid(name)? == *oid
        {
            return Ok(());
        }

        self.paths.insert(name.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_result(self) -> anyhow::Result<()> {
        if self.paths.is_empty() {
            return Ok(());
        }

        tracing::debug!(paths = ?self.paths, "untracked files in the way");
        Err(BitletError::UntrackedFileConflict(self.paths.into_iter().collect()).into())
    }
}
