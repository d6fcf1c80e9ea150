//! Best common ancestor search over the parent graph
//!
//! The alternative to the commit-log split point, selected with
//! `BITLET_MERGE_BASE=bca`. It works in two phases:
//!
//! 1. Walk back from both heads at once, newest commit first, tagging every
//!    commit with the side(s) it was reached from. A commit reached from both
//!    sides is a common ancestor; everything below it is marked stale.
//! 2. Drop every common ancestor that is itself an ancestor of another one.
//!    Whatever remains is a best common ancestor.
//!
//! Criss-cross histories can have several best common ancestors; the one
//! with the newest timestamp is returned.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b0000;
        const FROM_SOURCE = 0b0001;
        const FROM_TARGET = 0b0010;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
        const STALE = 0b0100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (VisitState::FROM_SOURCE, "SOURCE"),
            (VisitState::FROM_TARGET, "TARGET"),
            (VisitState::STALE, "STALE"),
            (VisitState::RESULT, "RESULT"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
        .collect::<Vec<_>>();

        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Loads the parents and timestamp of a commit.
pub trait CommitLoader {
    fn load(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit>;
}

impl<F> CommitLoader for F
where
    F: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    fn load(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        self(oid)
    }
}

pub struct BcaFinder<L: CommitLoader> {
    loader: L,
}

impl<L: CommitLoader> BcaFinder<L> {
    pub fn new(loader: L) -> Self {
        BcaFinder { loader }
    }

    /// Visit states of every common ancestor of `source` and `targets` that
    /// no other common ancestor hides.
    fn common_ancestors(
        &self,
        source: &ObjectId,
        targets: &HashSet<&ObjectId>,
    ) -> anyhow::Result<HashMap<ObjectId, VisitState>> {
        if targets.contains(source) {
            return Ok(HashMap::from([(source.clone(), VisitState::RESULT)]));
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut queue = BinaryHeap::new();

        let source_commit = self.loader.load(source)?;
        states.insert(source.clone(), VisitState::FROM_SOURCE);
        queue.push(source_commit);

        for &target in targets {
            states.insert(target.clone(), VisitState::FROM_TARGET);
            queue.push(self.loader.load(target)?);
        }

        // newest first, so a commit is only expanded after all its descendants
        while let Some(commit) = queue.pop() {
            let state = states.get(&commit.oid).copied().unwrap_or(VisitState::NONE);
            tracing::trace!(commit = %commit.oid.to_short_oid(), ?state, "visiting");

            if state.contains(VisitState::STALE) {
                continue;
            }

            let is_common = state.contains(VisitState::FROM_BOTH);
            if is_common {
                states.insert(commit.oid.clone(), state | VisitState::RESULT);
            }

            for parent in &commit.parents {
                let parent_state = states.get(parent).copied().unwrap_or(VisitState::NONE);
                if parent_state.contains(state) {
                    continue;
                }

                let mut next_state = parent_state | state;
                if is_common {
                    next_state |= VisitState::STALE;
                }

                states.insert(parent.clone(), next_state);
                queue.push(self.loader.load(parent)?);
            }
        }

        Ok(states
            .into_iter()
            .filter(|(_, state)| {
                state.contains(VisitState::RESULT) && !state.contains(VisitState::STALE)
            })
            .collect())
    }

    /// The best common ancestor of two commits, or `None` when their
    /// histories share no commit.
    pub fn find_best_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let candidates = self
            .common_ancestors(source, &HashSet::from([target]))?
            .into_keys()
            .collect::<HashSet<_>>();

        if candidates.is_empty() {
            return Ok(None);
        }
        tracing::debug!(count = candidates.len(), "common ancestors found");

        let mut redundant = HashSet::<ObjectId>::new();
        for candidate in &candidates {
            if redundant.contains(candidate) {
                continue;
            }

            let others = candidates
                .iter()
                .filter(|other| *other != candidate && !redundant.contains(*other))
                .collect::<HashSet<_>>();
            let states = self.common_ancestors(candidate, &others)?;

            // reached from another candidate: it sits below that candidate
            if states
                .get(candidate)
                .is_some_and(|state| state.contains(VisitState::FROM_TARGET))
            {
                redundant.insert(candidate.clone());
            }

            for other in others {
                if states
                    .get(other)
                    .is_some_and(|state| state.contains(VisitState::FROM_SOURCE))
                {
                    redundant.insert(other.clone());
                }
            }
        }

        let mut best = candidates
            .into_iter()
            .filter(|candidate| !redundant.contains(candidate))
            .map(|candidate| self.loader.load(&candidate))
            .collect::<anyhow::Result<Vec<_>>>()?;
        best.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.oid.cmp(&b.oid)));

        let chosen = best.into_iter().next().map(|commit| commit.oid);
        if let Some(oid) = &chosen {
            tracing::debug!(base = %oid.to_short_oid(), "best common ancestor");
        }

        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::VecDeque;

    /// Commit graph keyed by single-letter names; timestamps follow insertion
    /// order, one hour apart.
    #[derive(Debug, Default)]
    struct Graph {
        commits: HashMap<ObjectId, SlimCommit>,
    }

    impl Graph {
        fn with(mut self, name: &str, parents: &[&str]) -> Self {
            let timestamp: DateTime<FixedOffset> =
                DateTime::from_timestamp(1_700_000_000 + self.commits.len() as i64 * 3600, 0)
                    .unwrap()
                    .fixed_offset();
            let commit = SlimCommit {
                oid: oid(name),
                parents: parents.iter().map(|parent| oid(parent)).collect(),
                timestamp,
            };
            self.commits.insert(commit.oid.clone(), commit);
            self
        }

        fn loader(&self) -> impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_ {
            |oid| {
                self.commits
                    .get(oid)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("unknown commit {oid}"))
            }
        }

        fn bca(&self, source: &str, target: &str) -> Option<ObjectId> {
            BcaFinder::new(self.loader())
                .find_best_common_ancestor(&oid(source), &oid(target))
                .unwrap()
        }

        fn ancestors(&self, start: &ObjectId) -> HashSet<ObjectId> {
            let mut seen = HashSet::new();
            let mut queue = VecDeque::from([start.clone()]);
            while let Some(current) = queue.pop_front() {
                if seen.insert(current.clone()) {
                    queue.extend(self.commits[&current].parents.iter().cloned());
                }
            }
            seen
        }
    }

    fn oid(name: &str) -> ObjectId {
        ObjectId::hash_of([name.as_bytes()])
    }

    #[fixture]
    fn linear() -> Graph {
        // a <- b <- c <- d
        Graph::default()
            .with("a", &[])
            .with("b", &["a"])
            .with("c", &["b"])
            .with("d", &["c"])
    }

    #[fixture]
    fn fork() -> Graph {
        //   a
        //  / \
        // b   c
        // |   |
        // d   e
        Graph::default()
            .with("a", &[])
            .with("b", &["a"])
            .with("c", &["a"])
            .with("d", &["b"])
            .with("e", &["c"])
    }

    #[fixture]
    fn criss_cross() -> Graph {
        //   a
        //  / \
        // b   c
        // |\ /|
        // | X |
        // |/ \|
        // d   e
        Graph::default()
            .with("a", &[])
            .with("b", &["a"])
            .with("c", &["a"])
            .with("d", &["b", "c"])
            .with("e", &["c", "b"])
    }

    #[rstest]
    #[case("b", "d", "b")]
    #[case("d", "b", "b")]
    #[case("a", "d", "a")]
    #[case("c", "c", "c")]
    fn linear_history_picks_the_older_commit(
        linear: Graph,
        #[case] source: &str,
        #[case] target: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(linear.bca(source, target), Some(oid(expected)));
    }

    #[rstest]
    fn diverging_branches_meet_at_the_fork(fork: Graph) {
        assert_eq!(fork.bca("d", "e"), Some(oid("a")));
        assert_eq!(fork.bca("e", "b"), Some(oid("a")));
    }

    #[rstest]
    fn merged_side_branch_becomes_the_base(fork: Graph) {
        // f merges e into d; g continues from e
        let graph = fork.with("f", &["d", "e"]).with("g", &["e"]);

        assert_eq!(graph.bca("f", "g"), Some(oid("e")));
    }

    #[rstest]
    fn criss_cross_returns_one_of_the_best_ancestors(criss_cross: Graph) {
        let base = criss_cross.bca("d", "e").unwrap();

        assert!(base == oid("b") || base == oid("c"));
        assert_eq!(base, oid("c"), "ties go to the newest commit");
    }

    #[test]
    fn unrelated_roots_have_no_common_ancestor() {
        let graph = Graph::default()
            .with("a", &[])
            .with("b", &["a"])
            .with("x", &[])
            .with("y", &["x"]);

        assert_eq!(graph.bca("b", "y"), None);
    }

    #[test]
    fn the_result_is_never_an_ancestor_of_another_common_ancestor() {
        //     a
        //    /|\
        //   b c d
        //   |X| |
        //   e f g
        //    \|/
        //     h
        let graph = Graph::default()
            .with("a", &[])
            .with("b", &["a"])
            .with("c", &["a"])
            .with("d", &["a"])
            .with("e", &["b", "c"])
            .with("f", &["c", "d"])
            .with("g", &["d"])
            .with("h", &["e", "f", "g"])
            .with("i", &["f"]);

        let base = graph.bca("h", "i").unwrap();
        let common = graph
            .ancestors(&oid("h"))
            .intersection(&graph.ancestors(&oid("i")))
            .cloned()
            .collect::<HashSet<_>>();

        assert_eq!(base, oid("f"));
        for other in common.iter().filter(|other| **other != base) {
            assert!(!graph.ancestors(other).contains(&base));
        }
    }

    #[test]
    fn loader_failures_propagate() {
        let graph = Graph::default().with("b", &["missing"]).with("c", &["missing"]);

        let result = BcaFinder::new(graph.loader()).find_best_common_ancestor(&oid("b"), &oid("c"));

        assert!(result.is_err());
    }
}
