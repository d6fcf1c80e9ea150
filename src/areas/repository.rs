use crate::areas::database::Database;
use crate::areas::histories::{CURRENT_HISTORY, Histories};
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::remotes::Remotes;
use crate::areas::stages::Stages;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::stage::staging_area::StagingArea;
use crate::config::Config;
use crate::errors::BitletError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the metadata directory at the repository root
pub const METADATA_DIR: &str = ".bitlet";

pub struct Repository {
    path: Box<Path>,
    config: Config,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    stages: Stages,
    histories: Histories,
    remotes: Remotes,
}

/// State a command works on: the checked-out branch, its staging area and
/// the commit registry. Loaded once per command and written back once.
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    pub branch: Branch,
    pub stage: StagingArea,
    pub history: History,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let stages = Stages::new(metadata_path.clone().into_boxed_path());
        let histories = Histories::new(metadata_path.clone().into_boxed_path());
        let remotes = Remotes::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            config: Config::default(),
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
            stages,
            histories,
            remotes,
        })
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn stages(&self) -> &Stages {
        &self.stages
    }

    pub fn histories(&self) -> &Histories {
        &self.histories
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().join(HEAD_REF_NAME).is_file()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(BitletError::NotInitialized.into());
        }

        Ok(())
    }

    /// Run `operation` on the loaded context and persist the context only if
    /// it succeeds. A failed operation leaves branch, stage and history as
    /// they were on disk.
    pub fn with_context<T>(
        &self,
        operation: impl FnOnce(&mut RepositoryContext) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut context = self.open_context()?;
        let result = operation(&mut context)?;
        self.persist_context(&context)?;

        Ok(result)
    }

    /// Read-only counterpart of `with_context`.
    pub fn inspect_context<T>(
        &self,
        operation: impl FnOnce(&RepositoryContext) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let context = self.open_context()?;
        operation(&context)
    }

    pub fn open_context(&self) -> anyhow::Result<RepositoryContext> {
        self.ensure_initialized()?;

        let branch_name = self.refs.current_branch()?;
        let branch = self.refs.load_branch(&branch_name)?;
        let history = self.histories.load(CURRENT_HISTORY)?;
        let stage = self.stage_for(&branch, &history)?;

        Ok(RepositoryContext {
            branch,
            stage,
            history,
        })
    }

    pub fn persist_context(&self, context: &RepositoryContext) -> anyhow::Result<()> {
        self.histories.save(CURRENT_HISTORY, &context.history)?;
        self.refs.save_branch(&context.branch)?;
        self.stages.save(&context.stage)?;
        self.refs.set_current(context.branch.name())
    }

    /// The branch's persisted staging area, or a clean one over its head.
    pub fn stage_for(&self, branch: &Branch, history: &History) -> anyhow::Result<StagingArea> {
        if let Some(stage) = self.stages.load(branch.name())? {
            return Ok(stage);
        }

        let head = self.load_commit(history, branch.head())?;
        let tree = self.load_commit_tree(&head)?;

        Ok(StagingArea::new(branch.name().clone(), tree.tracked().clone()))
    }

    /// Look a commit up in the registry, falling back to the object store.
    pub fn load_commit(&self, history: &History, oid: &ObjectId) -> anyhow::Result<Commit> {
        if let Some(commit) = history.get(oid) {
            return Ok(commit.clone());
        }

        self.database.load_commit(oid)
    }

    pub fn load_commit_tree(&self, commit: &Commit) -> anyhow::Result<Tree> {
        self.database.load_tree(commit.tree_oid())
    }

    /// Freeze the staging area into a commit on top of the branch head.
    /// `merged` becomes the second parent of a merge commit.
    pub fn write_commit(
        &self,
        context: &mut RepositoryContext,
        message: String,
        merged: Option<&Commit>,
    ) -> anyhow::Result<ObjectId> {
        let snapshot = context.stage.tree_mut().commit();
        let tree_oid = self.database.store(&snapshot)?;

        let head = self.load_commit(&context.history, context.branch.head())?;
        let mut parents = vec![&head];
        parents.extend(merged);

        let commit = Commit::new(tree_oid, message, self.config.timestamp(), &parents)?;
        self.database.store(&commit)?;
        let oid = context.history.insert(commit)?;
        context.branch.append(oid.clone());

        tracing::info!(commit = %oid.to_short_oid(), branch = %context.branch.name(), "created commit");

        Ok(oid)
    }
}
