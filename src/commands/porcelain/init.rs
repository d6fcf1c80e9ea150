use crate::areas::repository::{Repository, RepositoryContext};
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::stage::staging_area::StagingArea;
use crate::errors::BitletError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(BitletError::AlreadyInitialized.into());
        }

        for dir in [
            self.database().objects_path().to_path_buf(),
            self.refs().branches_path(),
            self.stages().stages_path(),
            self.histories().histories_path(),
            self.remotes().remotes_path(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {} directory", dir.display()))?;
        }

        let tree_oid = self.database().store(&Tree::default())?;
        let initial = Commit::initial(tree_oid, self.config().timestamp());
        self.database().store(&initial)?;

        let mut history = History::default();
        let initial_oid = history.insert(initial)?;

        let branch = Branch::new(BranchName::try_parse(DEFAULT_BRANCH.to_string())?, initial_oid);
        let stage = StagingArea::new(branch.name().clone(), Default::default());

        self.persist_context(&RepositoryContext {
            branch,
            stage,
            history,
        })
        .context("Failed to write the initial repository state")?;

        writeln!(
            self.writer(),
            "Initialized empty Bitlet repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
