//! Persisted staging areas, one file per branch under `stage/`.

use crate::areas::{read_locked, write_locked};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::stage::staging_area::StagingArea;
use anyhow::Context;
use derive_new::new;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const STAGE_DIR: &str = "stage";

#[derive(Debug, new)]
pub struct Stages {
    /// Path to the metadata directory
    path: Box<Path>,
}

impl Stages {
    pub fn load(&self, branch: &BranchName) -> anyhow::Result<Option<StagingArea>> {
        let path = self.stage_path(branch);
        if !path.is_file() {
            return Ok(None);
        }

        let content = read_locked(&path)?;
        let stage = StagingArea::deserialize(Cursor::new(content))
            .with_context(|| format!("failed to parse stage file at {:?}", path))?;

        Ok(Some(stage))
    }

    pub fn save(&self, stage: &StagingArea) -> anyhow::Result<()> {
        write_locked(&self.stage_path(stage.branch()), &stage.serialize()?)
    }

    /// Remove a branch's stage file; a missing one is fine.
    pub fn delete(&self, branch: &BranchName) -> anyhow::Result<()> {
        let path = self.stage_path(branch);
        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to delete stage file at {:?}", path))?;
        }

        Ok(())
    }

    /// Remove the stage files of every branch whose name starts with `prefix`.
    pub fn delete_with_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        let dir = self.stages_path();
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix));

            if matches && entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())
                    .with_context(|| format!("failed to delete stage file at {:?}", entry.path()))?;
            }
        }

        Ok(())
    }

    pub fn stages_path(&self) -> PathBuf {
        self.path.join(STAGE_DIR)
    }

    fn stage_path(&self, branch: &BranchName) -> PathBuf {
        self.stages_path().join(branch.as_ref())
    }
}
