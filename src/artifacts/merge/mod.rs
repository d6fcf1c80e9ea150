//! Merge engine
//!
//! - `split_point`: commit-log split point (default merge base)
//! - `bca_finder`: best common ancestor over the parent graph
//! - `reconcile`: per-file three-way classification and conflict content

pub mod bca_finder;
pub mod reconcile;
pub mod split_point;

use crate::artifacts::branch::branch::Branch;
use crate::artifacts::history::History;
use crate::artifacts::merge::bca_finder::BcaFinder;
use crate::artifacts::merge::split_point::CommitLogSplitFinder;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MergeBaseStrategy {
    #[default]
    CommitLog,
    BestCommonAncestor,
}

impl FromStr for MergeBaseStrategy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "log" => Ok(MergeBaseStrategy::CommitLog),
            "bca" => Ok(MergeBaseStrategy::BestCommonAncestor),
            other => Err(anyhow::anyhow!(
                "Unknown merge base strategy {other:?} (expected \"log\" or \"bca\")"
            )),
        }
    }
}

impl MergeBaseStrategy {
    /// The commit the three-way merge of `given` into `current` starts from.
    pub fn merge_base(
        &self,
        history: &History,
        current: &Branch,
        given: &Branch,
    ) -> anyhow::Result<ObjectId> {
        match self {
            MergeBaseStrategy::CommitLog => CommitLogSplitFinder::new(history).find(current, given),
            MergeBaseStrategy::BestCommonAncestor => {
                let loader = |oid: &ObjectId| -> anyhow::Result<SlimCommit> {
                    history
                        .get(oid)
                        .ok_or_else(|| BitletError::ObjectNotFound(oid.to_string()))?
                        .to_slim()
                };

                match BcaFinder::new(loader).find_best_common_ancestor(current.head(), given.head())? {
                    Some(base) => Ok(base),
                    // unrelated histories: merge against the current branch's first commit
                    None => current.commit_at(0).cloned().ok_or_else(|| {
                        BitletError::Corrupt(format!("branch {} has no commits", current.name()))
                            .into()
                    }),
                }
            }
        }
    }
}

/// Result of a merge that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch was behind and now points at the given head
    FastForward { head: ObjectId },
    /// The given branch is already part of the current one
    AlreadyUpToDate,
    /// A two-parent commit was written; `conflicted` files carry markers
    Merged { commit: ObjectId, conflicted: bool },
}

impl MergeOutcome {
    pub fn is_conflicted(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicted: true, .. })
    }
}
