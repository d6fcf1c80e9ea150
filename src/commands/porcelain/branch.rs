use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::BitletError;

impl Repository {
    /// Create a branch at the current head. It shares the current branch's
    /// log and starts with a clean staging area.
    pub fn branch(&self, name: &str) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let name = BranchName::try_parse(name.to_string())?;
            if self.refs().branch_exists(&name) {
                return Err(BitletError::BranchExists(name.to_string()).into());
            }

            let branch = context.branch.fork(name.clone());
            self.refs().save_branch(&branch)?;
            self.stages().save(&context.stage.cloned_for(name))?;

            tracing::info!(branch = %branch.name(), head = %branch.head().to_short_oid(), "created branch");

            Ok(())
        })
    }

    /// Delete a branch pointer and its staging area. Its commits stay in the history.
    pub fn rm_branch(&self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let name = BranchName::from_spelling(name)?;
        if !self.refs().branch_exists(&name) {
            return Err(BitletError::BranchNotFound(name.to_string()).into());
        }
        if self.refs().is_current_branch(&name)? {
            return Err(BitletError::CannotRemoveCurrentBranch.into());
        }

        self.refs().delete_branch(&name)?;
        self.stages().delete(&name)
    }
}
