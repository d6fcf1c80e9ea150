//! Commit-log split point
//!
//! The default merge base. Both branches' commit logs are walked in step by
//! position. While the entries agree, the shared entry is the split point.
//! Past the first disagreement, an entry of one branch that the other
//! branch's head lists among its ancestors becomes a candidate, and the
//! candidate closest to the current head wins.
//!
//! This is a heuristic: on histories that diverged and merged repeatedly it
//! can miss the lowest common ancestor. `BcaFinder` gives exact results.

use crate::artifacts::branch::branch::Branch;
use crate::artifacts::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use derive_new::new;

#[derive(Debug, new)]
pub struct CommitLogSplitFinder<'h> {
    history: &'h History,
}

impl CommitLogSplitFinder<'_> {
    pub fn find(&self, current: &Branch, given: &Branch) -> anyhow::Result<ObjectId> {
        let mut split = current
            .commit_at(0)
            .cloned()
            .ok_or_else(|| BitletError::Corrupt(format!("branch {} has no commits", current.name())))?;
        let mut min_distance = usize::MAX;

        let current_head = self.commit(current.head())?;
        let given_head = self.commit(given.head())?;

        for index in 1..current.len().min(given.len()) {
            let (Some(ours), Some(theirs)) = (current.commit_at(index), given.commit_at(index)) else {
                break;
            };

            if ours == theirs {
                split = ours.clone();
                continue;
            }

            if given_head.is_ancestor(ours) {
                let distance = self.distance(ours, current.head(), current, given)?;
                if distance < min_distance {
                    split = ours.clone();
                    min_distance = distance;
                }
            }

            if current_head.is_ancestor(theirs) {
                let distance = self.distance(theirs, current.head(), current, given)?;
                if distance < min_distance {
                    split = theirs.clone();
                    min_distance = distance;
                }
            }
        }

        tracing::debug!(split = %split.to_short_oid(), "commit-log split point");

        Ok(split)
    }

    /// Hops from `to` back to `from`. Parent links are followed (the merged
    /// side first) until `to` shows up in a log that also lists `from`; the
    /// remaining gap is read off the log positions.
    fn distance(
        &self,
        from: &ObjectId,
        to: &ObjectId,
        current: &Branch,
        given: &Branch,
    ) -> anyhow::Result<usize> {
        let unreachable = current.len() + given.len();
        let mut hops = 0;
        let mut to = to.clone();

        loop {
            let log = if current.contains(&to) { current } else { given };

            if log.contains(from) {
                let gap = match (log.position(&to), log.position(from)) {
                    (Some(to_index), Some(from_index)) if to_index >= from_index => {
                        to_index - from_index
                    }
                    _ => unreachable,
                };
                return Ok(hops + gap);
            }

            let commit = self.commit(&to)?;
            match commit.second_parent().or(commit.parent()) {
                Some(parent) => to = parent.clone(),
                None => return Ok(hops + unreachable),
            }
            hops += 1;
        }
    }

    fn commit(&self, oid: &ObjectId) -> anyhow::Result<&Commit> {
        self.history
            .get(oid)
            .ok_or_else(|| BitletError::ObjectNotFound(oid.to_string()).into())
    }
}
