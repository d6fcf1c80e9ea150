use crate::artifacts::history::CHECKSUM_SIZE;
use crate::errors::BitletError;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Stream over a history file that keeps a running SHA-1 of every byte
/// passing through it. The file ends with that digest as a trailer.
#[derive(Debug)]
pub struct Checksum<S> {
    stream: S,
    digest: Sha1,
}

impl<S> Checksum<S> {
    pub(crate) fn new(stream: S) -> Self {
        Checksum {
            stream,
            digest: Sha1::new(),
        }
    }

    fn running_digest(&self) -> [u8; CHECKSUM_SIZE] {
        let mut digest = [0u8; CHECKSUM_SIZE];
        digest.copy_from_slice(&self.digest.clone().finalize());
        digest
    }
}

impl<S: Read> Checksum<S> {
    /// Read exactly `size` bytes and fold them into the digest. The buffer
    /// grows with the bytes actually present, so a corrupt length cannot
    /// force a large allocation.
    pub(crate) fn take(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut chunk = Vec::new();
        (&mut self.stream)
            .take(size as u64)
            .read_to_end(&mut chunk)
            .map_err(|_| BitletError::Corrupt("history file is unreadable".to_string()))?;
        if chunk.len() != size {
            return Err(BitletError::Corrupt(
                "history file ends before its last entry".to_string(),
            )
            .into());
        }
        self.digest.update(&chunk);

        Ok(chunk.into())
    }

    /// Compare the trailer against what has been read so far.
    pub(crate) fn verify(&mut self) -> anyhow::Result<()> {
        let mut trailer = [0u8; CHECKSUM_SIZE];
        self.stream.read_exact(&mut trailer).map_err(|_| {
            BitletError::Corrupt("history file is missing its checksum".to_string())
        })?;

        if trailer != self.running_digest() {
            return Err(BitletError::Corrupt("history checksum mismatch".to_string()).into());
        }

        Ok(())
    }
}

impl<S: Write> Checksum<S> {
    pub(crate) fn put(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(data)?;
        self.digest.update(data);

        Ok(())
    }

    /// Append the digest of everything written so far.
    pub(crate) fn seal(&mut self) -> anyhow::Result<()> {
        let trailer = self.running_digest();
        self.stream.write_all(&trailer)?;
        self.stream.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sealed(payload: &[u8]) -> Vec<u8> {
        let mut writer = Checksum::new(Vec::new());
        writer.put(payload).unwrap();
        writer.seal().unwrap();
        writer.stream
    }

    #[test]
    fn sealed_streams_verify() {
        let bytes = sealed(b"commit registry");
        let mut reader = Checksum::new(Cursor::new(bytes));

        assert_eq!(reader.take(15).unwrap().as_ref(), b"commit registry");
        reader.verify().unwrap();
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let mut bytes = sealed(b"commit registry");
        bytes[0] ^= 0xff;
        let mut reader = Checksum::new(Cursor::new(bytes));

        reader.take(15).unwrap();
        let error = reader.verify().unwrap_err();

        assert!(matches!(kind_of(&error), Some(BitletError::Corrupt(_))));
    }

    #[test]
    fn oversized_lengths_are_corruption() {
        let mut reader = Checksum::new(Cursor::new(sealed(b"entry")));

        let error = reader.take(u32::MAX as usize).unwrap_err();

        assert!(matches!(kind_of(&error), Some(BitletError::Corrupt(_))));
    }

    #[test]
    fn short_reads_are_corruption() {
        let mut reader = Checksum::new(Cursor::new(b"abc".to_vec()));

        let error = reader.take(8).unwrap_err();

        assert!(matches!(kind_of(&error), Some(BitletError::Corrupt(_))));
    }
}
