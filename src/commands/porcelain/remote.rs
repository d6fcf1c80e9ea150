use crate::areas::histories::CURRENT_HISTORY;
use crate::areas::repository::{Repository, RepositoryContext};
use crate::artifacts::branch::STORED_REMOTE_BRANCH_SEPARATOR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::remote::Remote;
use crate::artifacts::remote::transfer::{ObjectTransfer, missing_commits};
use crate::artifacts::stage::staging_area::StagingArea;
use crate::errors::BitletError;
use std::path::PathBuf;

impl Repository {
    /// Register another repository under `name`. Relative paths are taken
    /// from this repository's root.
    pub fn add_remote(&self, name: &str, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        // remote names end up in branch names and history file names
        if name == CURRENT_HISTORY || BranchName::try_parse(name.to_string()).is_err() {
            return Err(BitletError::InvalidRemoteName(name.to_string()).into());
        }

        let path = PathBuf::from(path);
        let path = if path.is_relative() {
            self.path().join(path)
        } else {
            path
        };

        self.remotes().add(&Remote::new(name, path))
    }

    /// Forget a remote along with its cached history and the staging areas
    /// of the branches fetched from it.
    pub fn rm_remote(&self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().remove(name)?;
        self.histories().delete(name)?;
        self.stages()
            .delete_with_prefix(&format!("{name}{STORED_REMOTE_BRANCH_SEPARATOR}"))
    }

    /// Send the current branch to `branch` on the remote. Only fast-forwards
    /// are accepted: the remote head must be known here and reachable from
    /// the local head.
    pub fn push(&self, remote_name: &str, branch: &str) -> anyhow::Result<()> {
        let pushed = self.inspect_context(|context| {
            let remote = self.remotes().load(remote_name)?.open()?;
            remote.ensure_initialized()?;

            let branch_name = BranchName::try_parse(branch.to_string())?;
            let local_head = context.branch.head();
            let local_commit = self.load_commit(&context.history, local_head)?;

            let remote_branch = remote.refs().load_branch_opt(&branch_name)?;
            if let Some(remote_branch) = &remote_branch {
                let remote_head = remote_branch.head();
                let reachable = remote_head == local_head || local_commit.is_ancestor(remote_head);
                if !context.history.contains(remote_head) || !reachable {
                    return Err(BitletError::RemoteDiverged.into());
                }
            }

            let mut remote_history = remote.histories().load(CURRENT_HISTORY)?;
            let missing = missing_commits(&context.history, local_head, &remote_history)?;
            let transfer = ObjectTransfer::new(self.database(), remote.database());
            for commit in &missing {
                transfer.copy_commit(commit)?;
                remote_history.insert(commit.clone())?;
            }

            let previous_tree = match &remote_branch {
                Some(remote_branch) => {
                    let previous = remote.load_commit(&remote_history, remote_branch.head())?;
                    remote.load_commit_tree(&previous)?
                }
                None => Tree::default(),
            };

            let updated_branch = match remote_branch {
                Some(mut remote_branch) => {
                    for commit in &missing {
                        remote_branch.append(commit.object_id()?);
                    }
                    if remote_branch.head() != local_head {
                        remote_branch.append(local_head.clone());
                    }
                    remote_branch
                }
                None => context.branch.fork(branch_name.clone()),
            };

            let tree = self.load_commit_tree(&local_commit)?;
            remote.histories().save(CURRENT_HISTORY, &remote_history)?;
            remote.refs().save_branch(&updated_branch)?;
            remote
                .stages()
                .save(&StagingArea::new(branch_name.clone(), tree.tracked().clone()))?;

            // a checked out branch gets its working files reset
            if remote.refs().is_current_branch(&branch_name)? {
                let mut migration = Migration::new(remote.database(), remote.workspace());
                migration.plan_forced(&previous_tree, tree.tracked())?;
                migration.apply()?;
            }

            tracing::info!(remote = remote_name, branch = %branch_name, commits = missing.len(), "pushed");

            Ok(missing.len())
        })?;

        writeln!(
            self.writer(),
            "Pushed {pushed} commit(s) to {remote_name}/{branch}."
        )?;

        Ok(())
    }

    /// Copy a remote branch and the commits it needs into this repository,
    /// as branch `<remote>-<branch>`.
    pub fn fetch(&self, remote_name: &str, branch: &str) -> anyhow::Result<()> {
        self.with_context(|context| self.fetch_into(context, remote_name, branch))
    }

    /// `fetch` followed by a merge of the fetched branch.
    pub fn pull(&self, remote_name: &str, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.fetch(remote_name, branch)?;
        self.merge(&format!("{remote_name}/{branch}"))
    }

    fn fetch_into(
        &self,
        context: &mut RepositoryContext,
        remote_name: &str,
        branch: &str,
    ) -> anyhow::Result<()> {
        let remote = self.remotes().load(remote_name)?.open()?;
        remote.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch.to_string())?;
        let remote_branch = remote
            .refs()
            .load_branch_opt(&branch_name)?
            .ok_or_else(|| BitletError::RemoteBranchNotFound(branch.to_string()))?;

        let remote_history = remote.histories().load(CURRENT_HISTORY)?;
        let missing = missing_commits(&remote_history, remote_branch.head(), &context.history)?;
        let transfer = ObjectTransfer::new(remote.database(), self.database());
        for commit in &missing {
            transfer.copy_commit(commit)?;
            context.history.insert(commit.clone())?;
        }
        self.histories().save(remote_name, &remote_history)?;

        let local_name = BranchName::for_remote(remote_name, &branch_name)?;
        let local_branch = remote_branch.renamed(local_name.clone());
        let head = self.load_commit(&context.history, local_branch.head())?;
        let stage = StagingArea::new(local_name.clone(), self.load_commit_tree(&head)?.tracked().clone());

        if &local_name == context.branch.name() {
            context.branch = local_branch;
            context.stage = stage;
        } else {
            self.refs().save_branch(&local_branch)?;
            self.stages().save(&stage)?;
        }

        tracing::info!(remote = remote_name, branch = %local_name, commits = missing.len(), "fetched");
        writeln!(
            self.writer(),
            "Fetched {} commit(s) into {}.",
            missing.len(),
            local_name
        )?;

        Ok(())
    }
}
