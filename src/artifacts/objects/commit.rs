//! Commit object
//!
//! A commit pins a snapshot together with a message, a timestamp, up to two
//! parents and the full set of commits reachable from it. Keeping that set
//! materialized turns "is X an ancestor of Y" into a set lookup, which the
//! split point search leans on heavily.
//!
//! The id is the SHA-1 of the snapshot id followed by the message, so two
//! commits of the same snapshot with the same message share an id.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! timestamp <unix-seconds> <timezone>
//! ancestor <sha>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeSet;
use std::io::BufRead;

pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Slim representation of a commit
///
/// Contains only what the best common ancestor search needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

impl PartialOrd for SlimCommit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlimCommit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    /// Empty for the initial commit, two entries for a merge
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    /// Every commit reachable through any parent chain, the commit itself excluded
    ancestors: BTreeSet<ObjectId>,
    message: String,
}

impl Commit {
    pub fn initial(tree_oid: ObjectId, timestamp: DateTime<FixedOffset>) -> Self {
        Commit {
            tree_oid,
            parents: vec![],
            timestamp,
            ancestors: BTreeSet::new(),
            message: INITIAL_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Build a commit on top of `parents`, the first one being the branch it
    /// lands on. The ancestor set is the union of every parent and its own
    /// ancestors.
    pub fn new(
        tree_oid: ObjectId,
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: &[&Commit],
    ) -> anyhow::Result<Self> {
        let mut parent_oids = Vec::with_capacity(parents.len());
        let mut ancestors = BTreeSet::new();

        for parent in parents {
            let parent_oid = parent.object_id()?;
            ancestors.extend(parent.ancestors.iter().cloned());
            ancestors.insert(parent_oid.clone());
            parent_oids.push(parent_oid);
        }

        Ok(Commit {
            tree_oid,
            parents: parent_oids,
            timestamp,
            ancestors,
            message,
        })
    }

    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn ancestors(&self) -> &BTreeSet<ObjectId> {
        &self.ancestors
    }

    pub fn is_ancestor(&self, oid: &ObjectId) -> bool {
        self.ancestors.contains(oid)
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_slim(&self) -> anyhow::Result<SlimCommit> {
        Ok(SlimCommit {
            oid: self.object_id()?,
            parents: self.parents.clone(),
            timestamp: self.timestamp,
        })
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for ancestor in &self.ancestors {
            lines.push(format!("ancestor {ancestor}"));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines
    }

    fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, timezone) = value
            .split_once(' ')
            .context("Invalid commit object: malformed timestamp")?;
        let seconds = seconds
            .parse::<i64>()
            .context("Invalid commit object: malformed timestamp")?;

        let datetime = DateTime::from_timestamp(seconds, 0)
            .context("Invalid commit object: timestamp out of range")?;
        let offset = DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .context("Invalid commit object: malformed timezone")?
        .offset()
        .to_owned();

        Ok(datetime.with_timezone(&offset))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type(), self.lines().join("\n").as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let mut lines = content.split('\n');

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?;

        while let Some(parent) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent.to_string())?);
            next_line = lines
                .next()
                .context("Invalid commit object: missing timestamp line")?;
        }

        let timestamp = next_line
            .strip_prefix("timestamp ")
            .context("Invalid commit object: invalid timestamp line")?;
        let timestamp = Self::parse_timestamp(timestamp)?;

        let mut ancestors = BTreeSet::new();
        for line in lines.by_ref() {
            match line.strip_prefix("ancestor ") {
                Some(ancestor) => {
                    ancestors.insert(ObjectId::try_parse(ancestor.to_string())?);
                }
                // the blank separator before the message
                None => break,
            }
        }

        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit {
            tree_oid,
            parents,
            timestamp,
            ancestors,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.lines().join("\n")
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(ObjectId::hash_of([
            self.tree_oid.as_ref().as_bytes(),
            self.message.as_bytes(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::Tree;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn at(seconds: i64) -> DateTime<FixedOffset> {
        DateTime::from_timestamp(seconds, 0)
            .unwrap()
            .with_timezone(&FixedOffset::east_opt(3600).unwrap())
    }

    fn tree_oid(marker: &str) -> ObjectId {
        ObjectId::hash_of([marker.as_bytes()])
    }

    fn reparse(commit: &Commit) -> Commit {
        let mut reader = Cursor::new(commit.serialize().unwrap().to_vec());
        ObjectType::read_header(&mut reader).unwrap();
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn id_depends_on_tree_and_message_only() {
        let empty = Tree::default().object_id().unwrap();
        let first = Commit::initial(empty.clone(), at(0));
        let second = Commit::initial(empty, at(1_000_000));

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[test]
    fn ancestors_accumulate_along_the_chain() {
        let root = Commit::initial(tree_oid("root"), at(0));
        let a = Commit::new(tree_oid("a"), "a".into(), at(10), &[&root]).unwrap();
        let b = Commit::new(tree_oid("b"), "b".into(), at(20), &[&a]).unwrap();

        let root_oid = root.object_id().unwrap();
        let a_oid = a.object_id().unwrap();
        assert_eq!(
            b.ancestors(),
            &BTreeSet::from([root_oid.clone(), a_oid.clone()])
        );
        assert!(b.is_ancestor(&root_oid));
        assert!(!a.is_ancestor(&b.object_id().unwrap()));
    }

    #[test]
    fn merge_commits_inherit_both_sides() {
        let root = Commit::initial(tree_oid("root"), at(0));
        let left = Commit::new(tree_oid("l"), "left".into(), at(10), &[&root]).unwrap();
        let right = Commit::new(tree_oid("r"), "right".into(), at(20), &[&root]).unwrap();
        let merge =
            Commit::new(tree_oid("m"), "merge".into(), at(30), &[&left, &right]).unwrap();

        assert!(merge.is_merge());
        assert_eq!(merge.parent(), Some(&left.object_id().unwrap()));
        assert_eq!(merge.second_parent(), Some(&right.object_id().unwrap()));
        assert_eq!(merge.ancestors().len(), 3);
    }

    #[test]
    fn parsing_keeps_every_field() {
        let root = Commit::initial(tree_oid("root"), at(0));
        let child = Commit::new(
            tree_oid("child"),
            "multi\nline\n\nmessage".into(),
            at(1_672_574_400),
            &[&root],
        )
        .unwrap();

        let parsed = reparse(&child);

        assert_eq!(parsed, child);
        assert_eq!(parsed.timestamp().offset().local_minus_utc(), 3600);
        assert_eq!(parsed.short_message(), "multi");
    }

    #[test]
    fn readable_timestamp_uses_the_log_format() {
        let commit = Commit::initial(tree_oid("root"), at(1_672_574_400));

        assert_eq!(commit.readable_timestamp(), "Sun Jan 1 13:00:00 2023 +0100");
    }
}
