use crate::artifacts::history::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::BitletError;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::{BufRead, Read, Write};

/// Fixed-size preamble of a history file. Only the current signature and
/// version are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryHeader {
    pub(crate) entries_count: u32,
}

impl HistoryHeader {
    pub(crate) fn for_entries(entries_count: u32) -> Self {
        HistoryHeader { entries_count }
    }
}

impl Packable for HistoryHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(SIGNATURE.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(VERSION)?;
        bytes.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(bytes.into())
    }
}

impl Unpackable for HistoryHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let corrupt = |what: &str| BitletError::Corrupt(format!("history header: {what}"));

        let mut signature = [0u8; 4];
        reader
            .read_exact(&mut signature)
            .map_err(|_| corrupt("truncated"))?;
        if signature != SIGNATURE.as_bytes() {
            return Err(corrupt("bad signature").into());
        }

        let version = reader
            .read_u32::<NetworkEndian>()
            .map_err(|_| corrupt("truncated"))?;
        if version != VERSION {
            return Err(corrupt(&format!("unsupported version {version}")).into());
        }

        let entries_count = reader
            .read_u32::<NetworkEndian>()
            .map_err(|_| corrupt("truncated"))?;

        Ok(HistoryHeader { entries_count })
    }
}
