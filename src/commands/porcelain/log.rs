use crate::areas::repository::Repository;
use crate::artifacts::log::LogEntry;
use crate::errors::BitletError;
use std::cmp::Reverse;

impl Repository {
    /// Walk the first-parent chain from the current head back to the initial commit.
    pub fn log(&self) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let mut next = Some(context.branch.head().clone());

            while let Some(oid) = next {
                let commit = self.load_commit(&context.history, &oid)?;
                writeln!(self.writer(), "{}", LogEntry::new(&oid, &commit))?;
                next = commit.parent().cloned();
            }

            Ok(())
        })
    }

    /// Every commit ever recorded, newest first.
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let mut commits = context.history.commits().collect::<Vec<_>>();
            commits.sort_by_key(|(oid, commit)| (Reverse(commit.timestamp()), *oid));

            for (oid, commit) in commits {
                writeln!(self.writer(), "{}", LogEntry::new(oid, commit))?;
            }

            Ok(())
        })
    }

    /// Print the ids of all commits whose message contains `query`.
    pub fn find(&self, query: &str) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let matches = context
                .history
                .commits()
                .filter(|(_, commit)| commit.message().contains(query))
                .map(|(oid, _)| oid)
                .collect::<Vec<_>>();

            if matches.is_empty() {
                return Err(BitletError::NoMatchingCommit.into());
            }

            for oid in matches {
                writeln!(self.writer(), "{oid}")?;
            }

            Ok(())
        })
    }
}
