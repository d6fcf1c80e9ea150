//! Snapshot (tree) object
//!
//! A tree maps filenames to blob ids. Besides the committed `tracked` map it
//! carries the pending changes of a staging area:
//!
//! - `staged`: names whose new blob will replace or extend `tracked`
//! - `removed`: tracked names that the next commit drops
//!
//! A name is never both staged and removed. Only `tracked` is part of the
//! stored object, so a tree's id depends on its names and blob ids alone.
//! Blob ids are part of the id, not just the names: two snapshots that
//! differ only in content get different ids, and so do commits on them
//! that share a message.
//!
//! On disk: `tree <size>\0` followed by sorted `<blob-oid> <name>` lines.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

pub type FileMap = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    tracked: FileMap,
    staged: FileMap,
    removed: BTreeSet<String>,
}

impl Tree {
    pub fn new(tracked: FileMap) -> Self {
        Tree {
            tracked,
            ..Default::default()
        }
    }

    pub fn tracked(&self) -> &FileMap {
        &self.tracked
    }

    pub fn staged(&self) -> &FileMap {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn tracked_oid(&self, name: &str) -> Option<&ObjectId> {
        self.tracked.get(name)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.tracked.contains_key(name)
    }

    pub fn is_staged(&self, name: &str) -> bool {
        self.staged.contains_key(name)
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.contains(name)
    }

    /// True when there is nothing to commit.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    /// Record `oid` as the next version of `name`.
    ///
    /// Staging the version already tracked drops any pending change for the
    /// name instead, so a clean tree stays clean.
    pub fn stage(&mut self, name: &str, oid: ObjectId) {
        self.removed.remove(name);

        if self.tracked.get(name) == Some(&oid) {
            self.staged.remove(name);
        } else {
            self.staged.insert(name.to_string(), oid);
        }
    }

    /// Drop a pending addition. Returns whether one existed.
    pub fn unstage(&mut self, name: &str) -> bool {
        self.staged.remove(name).is_some()
    }

    /// Schedule a tracked file for removal by the next commit.
    pub fn mark_removed(&mut self, name: &str) {
        self.staged.remove(name);
        self.removed.insert(name.to_string());
    }

    /// Withdraw a scheduled removal. Returns whether one existed.
    pub fn cancel_removal(&mut self, name: &str) -> bool {
        self.removed.remove(name)
    }

    /// Fold the pending changes into `tracked` and return the frozen snapshot.
    pub fn commit(&mut self) -> Tree {
        let staged = std::mem::take(&mut self.staged);
        self.tracked.extend(staged);

        for name in std::mem::take(&mut self.removed) {
            self.tracked.remove(&name);
        }

        Tree::new(self.tracked.clone())
    }

    pub fn clear_pending(&mut self) {
        self.staged.clear();
        self.removed.clear();
    }

    /// Replace the committed state and forget any pending change.
    pub fn reset_to(&mut self, tracked: FileMap) {
        self.tracked = tracked;
        self.clear_pending();
    }

    pub(crate) fn restore_pending(&mut self, staged: FileMap, removed: BTreeSet<String>) {
        self.staged = staged;
        self.removed = removed;
    }

    fn payload(&self) -> String {
        self.tracked
            .iter()
            .map(|(name, oid)| format!("{oid} {name}\n"))
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type(), self.payload().as_bytes()))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tracked = FileMap::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let (oid, name) = line
                .split_once(' ')
                .context("Invalid tree object: malformed entry")?;
            tracked.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
        }

        Ok(Tree::new(tracked))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.tracked
            .iter()
            .map(|(name, oid)| format!("blob {oid}    {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
