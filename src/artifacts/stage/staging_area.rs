//! Staging area record
//!
//! ## File Format
//!
//! ```text
//! branch <name>
//! tracked <blob-oid> <filename>
//! staged <blob-oid> <filename>
//! removed <filename>
//! ```

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{FileMap, Tree};
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    branch: BranchName,
    tree: Tree,
}

impl StagingArea {
    /// A clean staging area over the given committed files.
    pub fn new(branch: BranchName, tracked: FileMap) -> Self {
        StagingArea {
            branch,
            tree: Tree::new(tracked),
        }
    }

    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn is_clean(&self) -> bool {
        self.tree.is_clean()
    }

    /// Same contents, owned by another branch, without pending changes.
    pub fn cloned_for(&self, branch: BranchName) -> Self {
        StagingArea::new(branch, self.tree.tracked().clone())
    }

    fn parse_entry(rest: &str) -> anyhow::Result<(String, ObjectId)> {
        let (oid, name) = rest
            .split_once(' ')
            .context("Invalid stage file: malformed entry")?;

        Ok((name.to_string(), ObjectId::try_parse(oid.to_string())?))
    }
}

impl Packable for StagingArea {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!("branch {}", self.branch)];
        lines.extend(
            self.tree
                .tracked()
                .iter()
                .map(|(name, oid)| format!("tracked {oid} {name}")),
        );
        lines.extend(
            self.tree
                .staged()
                .iter()
                .map(|(name, oid)| format!("staged {oid} {name}")),
        );
        lines.extend(self.tree.removed().iter().map(|name| format!("removed {name}")));

        Ok(Bytes::from(lines.join("\n") + "\n"))
    }
}

impl Unpackable for StagingArea {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut lines = reader.lines();

        let branch = lines
            .next()
            .transpose()?
            .and_then(|line| line.strip_prefix("branch ").map(str::to_string))
            .context("Invalid stage file: missing branch line")?;
        let branch = BranchName::try_parse(branch)?;

        let mut tracked = FileMap::new();
        let mut staged = FileMap::new();
        let mut removed = BTreeSet::new();

        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let (kind, rest) = line
                .split_once(' ')
                .context("Invalid stage file: malformed line")?;
            match kind {
                "tracked" => {
                    let (name, oid) = Self::parse_entry(rest)?;
                    tracked.insert(name, oid);
                }
                "staged" => {
                    let (name, oid) = Self::parse_entry(rest)?;
                    staged.insert(name, oid);
                }
                "removed" => {
                    removed.insert(rest.to_string());
                }
                other => anyhow::bail!("Invalid stage file: unknown entry kind {other:?}"),
            }
        }

        let mut tree = Tree::new(tracked);
        tree.restore_pending(staged, removed);

        Ok(StagingArea { branch, tree })
    }
}
