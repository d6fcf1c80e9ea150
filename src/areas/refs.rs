//! Branch records and the HEAD pointer
//!
//! ## File Format
//!
//! - `HEAD` holds `ref: <branch>` naming the checked-out branch
//! - `branches/<name>` holds one packed `Branch` (name, head, commit log)

use crate::areas::{read_locked, write_locked};
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::BitletError;
use anyhow::Context;
use derive_new::new;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

pub const BRANCHES_DIR: &str = "branches";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.bitlet`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the checked-out branch, as recorded in HEAD.
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .ok_or_else(|| BitletError::Corrupt(format!("HEAD is not a symbolic ref: {content}")))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    pub fn is_current_branch(&self, name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == name)
    }

    pub fn set_current(&self, name: &BranchName) -> anyhow::Result<()> {
        write_locked(&self.head_path(), format!("ref: {name}\n").as_bytes())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    pub fn load_branch(&self, name: &BranchName) -> anyhow::Result<Branch> {
        self.load_branch_opt(name)?
            .ok_or_else(|| BitletError::BranchNotFound(name.to_string()).into())
    }

    pub fn load_branch_opt(&self, name: &BranchName) -> anyhow::Result<Option<Branch>> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = read_locked(&path)?;
        let branch = Branch::deserialize(Cursor::new(content))
            .with_context(|| format!("failed to parse branch file at {:?}", path))?;

        Ok(Some(branch))
    }

    pub fn save_branch(&self, branch: &Branch) -> anyhow::Result<()> {
        tracing::trace!(branch = %branch.name(), head = %branch.head(), "saving branch");
        write_locked(&self.branch_path(branch.name()), &branch.serialize()?)
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Err(BitletError::BranchNotFound(name.to_string()).into());
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("failed to delete branch file at {:?}", path))
    }

    /// Every stored branch name, sorted. Dot files are leftover temp files.
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let mut names = WalkDir::new(self.branches_path())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .map(BranchName::try_parse)
            .collect::<anyhow::Result<Vec<_>>>()?;
        names.sort();

        Ok(names)
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn branches_path(&self) -> PathBuf {
        self.path.join(BRANCHES_DIR)
    }

    fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.branches_path().join(name.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use crate::errors::kind_of;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn name(raw: &str) -> BranchName {
        BranchName::try_parse(raw.to_string()).unwrap()
    }

    fn branch(raw: &str) -> Branch {
        Branch::new(name(raw), ObjectId::hash_of([raw.as_bytes()]))
    }

    #[rstest]
    fn head_round_trips_through_the_symref(refs_dir: TempDir) {
        let refs = Refs::new(refs_dir.path().to_path_buf().into_boxed_path());

        refs.set_current(&name("feature")).unwrap();

        assert_eq!(refs.current_branch().unwrap(), name("feature"));
        assert!(refs.is_current_branch(&name("feature")).unwrap());
    }

    #[rstest]
    fn branches_are_listed_in_name_order(refs_dir: TempDir) {
        let refs = Refs::new(refs_dir.path().to_path_buf().into_boxed_path());
        for raw in ["zeta", "alpha", "master"] {
            refs.save_branch(&branch(raw)).unwrap();
        }

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![name("alpha"), name("master"), name("zeta")]
        );
    }

    #[rstest]
    fn branches_named_like_temp_files_are_listed(refs_dir: TempDir) {
        let refs = Refs::new(refs_dir.path().to_path_buf().into_boxed_path());
        refs.save_branch(&branch("master")).unwrap();
        refs.save_branch(&branch("tmp-work")).unwrap();
        std::fs::write(refs.branches_path().join(".tmp-42"), b"partial").unwrap();

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![name("master"), name("tmp-work")]
        );
    }

    #[rstest]
    fn deleted_branches_are_gone(refs_dir: TempDir) {
        let refs = Refs::new(refs_dir.path().to_path_buf().into_boxed_path());
        refs.save_branch(&branch("topic")).unwrap();

        refs.delete_branch(&name("topic")).unwrap();

        assert!(!refs.branch_exists(&name("topic")));
        let error = refs.load_branch(&name("topic")).unwrap_err();
        assert_eq!(
            kind_of(&error),
            Some(&BitletError::BranchNotFound("topic".to_string()))
        );
    }
}
