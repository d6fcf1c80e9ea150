//! Working directory access
//!
//! The working directory is flat: only regular files directly under the
//! repository root are versioned. Hidden entries (the metadata directory
//! among them) are never listed.

use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_files(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !Self::is_ignored(name))
            .collect())
    }

    fn is_ignored(name: &str) -> bool {
        name.starts_with('.')
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path.join(name).is_file()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(name);
        if !file_path.is_file() {
            return Err(BitletError::FileNotFound(name.to_string()).into());
        }

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(name)?))
    }

    /// Id the file's current content would get in the object store.
    pub fn blob_oid(&self, name: &str) -> anyhow::Result<ObjectId> {
        self.parse_blob(name)?.object_id()
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file. A file that is already gone is not an error.
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        Ok(())
    }

    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete)?;
        self.apply_migration_action_set(migration, ActionType::Modify)?;
        self.apply_migration_action_set(migration, ActionType::Add)?;

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
    ) -> anyhow::Result<()> {
        let Some(entries) = migration.actions().get(&action) else {
            return Ok(());
        };

        for (name, oid) in entries {
            match (&action, oid) {
                (ActionType::Delete, None) => self.remove_file(name)?,
                (ActionType::Add | ActionType::Modify, Some(oid)) => {
                    let data = migration.load_blob_data(oid)?;
                    self.write_file(name, &data)?;
                }
                _ => return Err(anyhow::anyhow!("Invalid action and entry combination")),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_only_visible_top_level_files() {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("b.txt").write_str("b").unwrap();
        dir.child(".hidden").write_str("h").unwrap();
        dir.child(".bitlet/HEAD").write_str("ref: master").unwrap();
        dir.child("nested/c.txt").write_str("c").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let files = workspace.list_files().unwrap();

        assert_eq!(
            files,
            BTreeSet::from(["a.txt".to_string(), "b.txt".to_string()])
        );
    }

    #[test]
    fn reading_a_missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let error = workspace.read_file("ghost.txt").unwrap_err();

        assert_eq!(
            kind_of(&error),
            Some(&BitletError::FileNotFound("ghost.txt".to_string()))
        );
    }

    #[test]
    fn removing_twice_is_harmless() {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        workspace.remove_file("a.txt").unwrap();
        workspace.remove_file("a.txt").unwrap();

        assert!(!workspace.exists("a.txt"));
    }
}
