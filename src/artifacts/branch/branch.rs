//! Branch record
//!
//! ## File Format
//!
//! ```text
//! name <branch>
//! head <oid>
//! log <oid>
//! log <oid>
//! ```
//!
//! The log lists every commit that became the head, oldest first. The same
//! commit may appear twice after a reset.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: BranchName,
    head: ObjectId,
    commit_log: Vec<ObjectId>,
}

impl Branch {
    pub fn new(name: BranchName, head: ObjectId) -> Self {
        Branch {
            name,
            commit_log: vec![head.clone()],
            head,
        }
    }

    /// A new branch starting where this one is, sharing its log.
    pub fn fork(&self, name: BranchName) -> Self {
        Branch {
            name,
            head: self.head.clone(),
            commit_log: self.commit_log.clone(),
        }
    }

    pub fn renamed(mut self, name: BranchName) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    pub fn commit_log(&self) -> &[ObjectId] {
        &self.commit_log
    }

    /// Move the head to `oid`, recording it in the log.
    pub fn append(&mut self, oid: ObjectId) {
        self.commit_log.push(oid.clone());
        self.head = oid;
    }

    /// Adopt the head and log of `other`.
    pub fn fast_forward_to(&mut self, other: &Branch) {
        self.head = other.head.clone();
        self.commit_log = other.commit_log.clone();
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.commit_log.contains(oid)
    }

    /// Index of the first log entry equal to `oid`.
    pub fn position(&self, oid: &ObjectId) -> Option<usize> {
        self.commit_log.iter().position(|entry| entry == oid)
    }

    pub fn commit_at(&self, index: usize) -> Option<&ObjectId> {
        self.commit_log.get(index)
    }

    pub fn len(&self) -> usize {
        self.commit_log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commit_log.is_empty()
    }
}

impl Packable for Branch {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!("name {}", self.name), format!("head {}", self.head)];
        lines.extend(self.commit_log.iter().map(|oid| format!("log {oid}")));

        Ok(Bytes::from(lines.join("\n") + "\n"))
    }
}

impl Unpackable for Branch {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut lines = reader.lines();

        let name = lines
            .next()
            .transpose()?
            .and_then(|line| line.strip_prefix("name ").map(str::to_string))
            .context("Invalid branch file: missing name line")?;
        let name = BranchName::try_parse(name)?;

        let head = lines
            .next()
            .transpose()?
            .and_then(|line| line.strip_prefix("head ").map(str::to_string))
            .context("Invalid branch file: missing head line")?;
        let head = ObjectId::try_parse(head)?;

        let mut commit_log = Vec::new();
        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let oid = line
                .strip_prefix("log ")
                .context("Invalid branch file: invalid log line")?;
            commit_log.push(ObjectId::try_parse(oid.to_string())?);
        }

        Ok(Branch {
            name,
            head,
            commit_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(marker: &str) -> ObjectId {
        ObjectId::hash_of([marker.as_bytes()])
    }

    fn name(raw: &str) -> BranchName {
        BranchName::try_parse(raw.to_string()).unwrap()
    }

    #[test]
    fn new_branch_logs_its_head() {
        let branch = Branch::new(name("master"), oid("root"));

        assert_eq!(branch.commit_log(), &[oid("root")]);
        assert_eq!(branch.head(), &oid("root"));
    }

    #[test]
    fn fork_shares_history_but_not_future_commits() {
        let mut master = Branch::new(name("master"), oid("root"));
        master.append(oid("a"));
        let mut feature = master.fork(name("feature"));
        feature.append(oid("b"));

        assert_eq!(master.commit_log(), &[oid("root"), oid("a")]);
        assert_eq!(feature.commit_log(), &[oid("root"), oid("a"), oid("b")]);
        assert_eq!(feature.position(&oid("a")), Some(1));
        assert!(!master.contains(&oid("b")));
    }

    #[test]
    fn position_reports_the_first_occurrence() {
        let mut branch = Branch::new(name("master"), oid("root"));
        branch.append(oid("a"));
        branch.append(oid("root"));

        assert_eq!(branch.position(&oid("root")), Some(0));
        assert_eq!(branch.head(), &oid("root"));
        assert_eq!(branch.len(), 3);
    }

    #[test]
    fn stored_form_parses_back() {
        let mut branch = Branch::new(name("origin-master"), oid("root"));
        branch.append(oid("a"));

        let packed = branch.serialize().unwrap();
        let parsed = Branch::deserialize(Cursor::new(packed.to_vec())).unwrap();

        assert_eq!(parsed, branch);
    }
}
