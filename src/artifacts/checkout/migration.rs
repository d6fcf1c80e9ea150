//! Checkout migration
//!
//! Moving the working directory to another snapshot happens in two steps:
//!
//! 1. `plan` compares the current branch's tracked files with the target
//!    snapshot and records which files to add, modify and delete. Untracked
//!    files the move would overwrite are collected as conflicts.
//! 2. `apply` writes the planned changes, only if planning succeeded.
//!
//! Files staged for addition but absent from the target are left alone.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::UntrackedConflicts;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{FileMap, Tree};
use bytes::Bytes;
use std::collections::HashMap;

/// Type of file system action required for checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Modify existing file
    Modify,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database, workspace: &'r Workspace) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Migration {
            database,
            workspace,
            actions,
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    /// Plan the move from `current` to `target`, failing with
    /// `UntrackedFileConflict` when an untracked file is in the way.
    pub fn plan(&mut self, current: &Tree, target: &FileMap) -> anyhow::Result<()> {
        self.record_changes(current, target)?.into_result()
    }

    /// Plan the move from `current` to `target`, overwriting untracked files.
    pub fn plan_forced(&mut self, current: &Tree, target: &FileMap) -> anyhow::Result<()> {
        let conflicts = self.record_changes(current, target)?;
        if !conflicts.is_empty() {
            tracing::warn!("overwriting untracked files in {:?}", self.workspace.path());
        }

        Ok(())
    }

    fn record_changes(
        &mut self,
        current: &Tree,
        target: &FileMap,
    ) -> anyhow::Result<UntrackedConflicts<'r>> {
        let mut conflicts = UntrackedConflicts::new(self.workspace);

        for (name, oid) in target {
            match current.tracked_oid(name) {
                None => {
                    conflicts.check(current, name, Some(oid))?;
                    self.record(ActionType::Add, name, Some(oid.clone()));
                }
                Some(tracked) if tracked != oid => {
                    self.record(ActionType::Modify, name, Some(oid.clone()));
                }
                // unchanged files still get their committed content back
                Some(_) => {
                    if !self.matches_workspace(name, oid)? {
                        self.record(ActionType::Modify, name, Some(oid.clone()));
                    }
                }
            }
        }

        for name in current.tracked().keys() {
            if !target.contains_key(name) {
                self.record(ActionType::Delete, name, None);
            }
        }

        Ok(conflicts)
    }

    pub fn apply(&self) -> anyhow::Result<()> {
        tracing::debug!(
            added = self.count(&ActionType::Add),
            modified = self.count(&ActionType::Modify),
            deleted = self.count(&ActionType::Delete),
            "applying checkout migration"
        );

        self.workspace.apply_migration(self)
    }

    /// Plan and apply in one go.
    pub fn run(&mut self, current: &Tree, target: &FileMap) -> anyhow::Result<()> {
        self.plan(current, target)?;
        self.apply()
    }

    pub fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        self.database.get(oid)
    }

    fn matches_workspace(&self, name: &str, oid: &ObjectId) -> anyhow::Result<bool> {
        if !self.workspace.exists(name) {
            return Ok(false);
        }

        Ok(self.workspace.blob_oid(name)? == *oid)
    }

    fn record(&mut self, action: ActionType, name: &str, oid: Option<ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid));
    }

    fn count(&self, action: &ActionType) -> usize {
        self.actions.get(action).map_or(0, Vec::len)
    }
}
