//! Commit history registry
//!
//! Every commit ever created, merged or fetched into this repository, keyed
//! by id. Commits stay here after the branches pointing at them are gone,
//! which is what `global-log`, `find` and `reset` read from. A copy of each
//! remote's registry is cached under its name after a fetch.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "HIST" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries:
//!   - Length of the packed commit (4 bytes, big-endian)
//!   - Packed commit, framed as in the object store
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod history_header;

use crate::artifacts::history::checksum::Checksum;
use crate::artifacts::history::history_header::HistoryHeader;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::BitletError;
use anyhow::anyhow;
use byteorder::ByteOrder;
use std::collections::BTreeMap;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// 4 bytes for marker, 4 for version, 4 for entries count
pub const HEADER_SIZE: usize = 12;

pub const SIGNATURE: &str = "HIST";

pub const VERSION: u32 = 1;

const ENTRY_LENGTH_SIZE: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    commits: BTreeMap<ObjectId, Commit>,
}

impl History {
    /// Register a commit. Returns its id; an already known id is left alone.
    pub fn insert(&mut self, commit: Commit) -> anyhow::Result<ObjectId> {
        let oid = commit.object_id()?;
        self.commits.entry(oid.clone()).or_insert(commit);

        Ok(oid)
    }

    pub fn get(&self, oid: &ObjectId) -> Option<&Commit> {
        self.commits.get(oid)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.commits.contains_key(oid)
    }

    pub fn commits(&self) -> impl Iterator<Item = (&ObjectId, &Commit)> {
        self.commits.iter()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Resolve a full id or a unique prefix of one.
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.is_empty() {
            return Err(BitletError::CommitNotFound(prefix.to_string()).into());
        }

        let mut candidates = self
            .commits
            .keys()
            .filter(|oid| oid.starts_with(prefix));

        match (candidates.next(), candidates.next()) {
            (Some(oid), None) => Ok(oid.clone()),
            (Some(_), Some(_)) => Err(BitletError::AmbiguousCommitId(prefix.to_string()).into()),
            (None, _) => Err(BitletError::CommitNotFound(prefix.to_string()).into()),
        }
    }

    pub(crate) fn read_from(reader: &mut Checksum<impl std::io::Read>) -> anyhow::Result<Self> {
        let header_bytes = reader.take(HEADER_SIZE)?;
        let header = HistoryHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        let mut history = History::default();
        for _ in 0..header.entries_count {
            let length = reader.take(ENTRY_LENGTH_SIZE)?;
            let length = byteorder::NetworkEndian::read_u32(&length) as usize;

            let entry = reader.take(length)?;
            let mut entry_reader = std::io::Cursor::new(entry);
            match ObjectType::read_header(&mut entry_reader)? {
                ObjectType::Commit => {
                    history.insert(Commit::deserialize(entry_reader)?)?;
                }
                other => return Err(anyhow!("Unexpected {other} entry in history file")),
            }
        }

        reader.verify()?;

        Ok(history)
    }

    pub(crate) fn write_to(&self, writer: &mut Checksum<impl std::io::Write>) -> anyhow::Result<()> {
        let header = HistoryHeader::for_entries(self.commits.len() as u32);
        writer.put(&header.serialize()?)?;

        let mut length = [0u8; ENTRY_LENGTH_SIZE];
        for commit in self.commits.values() {
            let packed = commit.serialize()?;
            byteorder::NetworkEndian::write_u32(&mut length, packed.len() as u32);
            writer.put(&length)?;
            writer.put(&packed)?;
        }

        writer.seal()
    }
}
