use crate::areas::repository::{Repository, RepositoryContext};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::stage::staging_area::StagingArea;
use crate::errors::BitletError;

impl Repository {
    /// Restore a file to its version in the head commit. The staging area is
    /// not touched.
    pub fn checkout_file(&self, file: &str) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let head = self.load_commit(&context.history, context.branch.head())?;
            self.restore_file(&head, file)
        })
    }

    /// Restore a file to its version in the commit named by `commit_id`
    /// (full id or unique prefix).
    pub fn checkout_commit_file(&self, commit_id: &str, file: &str) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let oid = context.history.resolve_prefix(commit_id)?;
            let commit = self.load_commit(&context.history, &oid)?;
            self.restore_file(&commit, file)
        })
    }

    /// Switch to another branch. The working directory moves to the target's
    /// head and the pending changes of the branch left behind are dropped.
    pub fn checkout_branch(&self, name: &str) -> anyhow::Result<()> {
        self.with_context(|context| {
            let name = BranchName::from_spelling(name)?;
            if &name == context.branch.name() {
                return Err(BitletError::AlreadyOnBranch(name.to_string()).into());
            }

            let target = self.refs().load_branch(&name)?;
            let head = self.load_commit(&context.history, target.head())?;
            let tree = self.load_commit_tree(&head)?;

            Migration::new(self.database(), self.workspace())
                .run(context.stage.tree(), tree.tracked())?;

            self.stages()
                .save(&context.stage.cloned_for(context.branch.name().clone()))?;

            context.stage = StagingArea::new(name, tree.tracked().clone());
            context.branch = target;

            tracing::info!(branch = %context.branch.name(), "switched branch");

            Ok(())
        })?;

        writeln!(self.writer(), "Switched to branch '{name}'")?;

        Ok(())
    }

    /// Move the current branch to an arbitrary commit, restoring its files.
    pub fn reset(&self, commit_id: &str) -> anyhow::Result<()> {
        self.with_context(|context| self.reset_to(context, commit_id))
    }

    fn reset_to(&self, context: &mut RepositoryContext, commit_id: &str) -> anyhow::Result<()> {
        let oid = context.history.resolve_prefix(commit_id)?;
        let commit = self.load_commit(&context.history, &oid)?;
        let tree = self.load_commit_tree(&commit)?;

        Migration::new(self.database(), self.workspace())
            .run(context.stage.tree(), tree.tracked())?;

        context.branch.append(oid);
        context.stage = StagingArea::new(context.branch.name().clone(), tree.tracked().clone());

        Ok(())
    }

    fn restore_file(&self, commit: &Commit, file: &str) -> anyhow::Result<()> {
        let tree = self.load_commit_tree(commit)?;
        let oid = tree
            .tracked_oid(file)
            .ok_or_else(|| BitletError::FileNotInCommit(file.to_string()))?;

        let content = self.database().get(oid)?;
        self.workspace().write_file(file, &content)
    }
}
