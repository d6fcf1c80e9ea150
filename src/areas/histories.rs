//! Commit registries on disk: `history/current` for this repository and
//! `history/<remote>` for the cached copy of each fetched remote.

use crate::artifacts::history::History;
use crate::artifacts::history::checksum::Checksum;
use anyhow::Context;
use derive_new::new;
use fake::rand;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

pub const HISTORY_DIR: &str = "history";

/// Alias of the local repository's own history
pub const CURRENT_HISTORY: &str = "current";

#[derive(Debug, new)]
pub struct Histories {
    /// Path to the metadata directory
    path: Box<Path>,
}

impl Histories {
    /// Load a history; a missing file is an empty history.
    pub fn load(&self, alias: &str) -> anyhow::Result<History> {
        let path = self.history_path(alias);
        if !path.is_file() {
            return Ok(History::default());
        }

        let mut history_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&path)
            .with_context(|| format!("failed to open history file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut history_file, file_guard::Lock::Shared, 0, 1)?;

        // an empty file is what a crash between create and write leaves behind
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(History::default());
        }

        let mut reader = Checksum::new(lock.deref_mut());
        History::read_from(&mut reader)
            .with_context(|| format!("failed to read history file at {:?}", path))
    }

    pub fn save(&self, alias: &str, history: &History) -> anyhow::Result<()> {
        let path = self.history_path(alias);
        std::fs::create_dir_all(self.histories_path())?;

        let temp_path = self
            .histories_path()
            .join(format!(".tmp-{}", rand::random::<u32>()));
        {
            let mut history_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("failed to open history file at {:?}", temp_path))?;
            let mut lock =
                file_guard::lock(&mut history_file, file_guard::Lock::Exclusive, 0, 1)?;

            let mut writer = Checksum::new(lock.deref_mut());
            history.write_to(&mut writer)?;
        }

        tracing::trace!(alias, commits = history.len(), "saving history");
        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("failed to move history file into {:?}", path))
    }

    pub fn delete(&self, alias: &str) -> anyhow::Result<()> {
        let path = self.history_path(alias);
        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to delete history file at {:?}", path))?;
        }

        Ok(())
    }

    pub fn histories_path(&self) -> PathBuf {
        self.path.join(HISTORY_DIR)
    }

    fn history_path(&self, alias: &str) -> PathBuf {
        self.histories_path().join(alias)
    }
}
