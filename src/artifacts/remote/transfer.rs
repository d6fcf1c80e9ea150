use crate::areas::database::Database;
use crate::artifacts::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use derive_new::new;
use std::collections::{BTreeSet, VecDeque};

/// Copies commits, with their snapshots and blobs, between two object stores.
#[derive(Debug, new)]
pub struct ObjectTransfer<'r> {
    source: &'r Database,
    target: &'r Database,
}

impl ObjectTransfer<'_> {
    pub fn copy_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        let tree_oid = commit.tree_oid();
        self.copy_object(tree_oid)?;

        for blob_oid in self.source.load_tree(tree_oid)?.tracked().values() {
            self.copy_object(blob_oid)?;
        }

        let commit_oid = self.target.store(commit)?;
        tracing::info!(commit = %commit_oid.to_short_oid(), "transferred commit");

        Ok(commit_oid)
    }

    fn copy_object(&self, oid: &ObjectId) -> anyhow::Result<()> {
        if self.target.contains(oid) {
            return Ok(());
        }

        self.target.store_raw(oid, self.source.load(oid)?)
    }
}

/// Commits reachable from `head` in `source` that `known` lacks, oldest first.
pub fn missing_commits(
    source: &History,
    head: &ObjectId,
    known: &History,
) -> anyhow::Result<Vec<Commit>> {
    let mut missing = Vec::new();
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::from([head.clone()]);

    while let Some(oid) = queue.pop_front() {
        if known.contains(&oid) || !visited.insert(oid.clone()) {
            continue;
        }

        let commit = source
            .get(&oid)
            .ok_or_else(|| BitletError::ObjectNotFound(oid.to_string()))?;
        queue.extend(commit.parents().iter().cloned());
        missing.push(commit.clone());
    }

    // parents were found after their children; equal timestamps keep that order reversed
    missing.reverse();
    missing.sort_by_key(|commit| commit.timestamp());

    Ok(missing)
}
