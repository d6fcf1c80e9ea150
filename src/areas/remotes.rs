//! Registered remotes, one file per name under `remotes/`.

use crate::areas::{read_locked, write_locked};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::remote::Remote;
use crate::errors::BitletError;
use anyhow::Context;
use derive_new::new;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const REMOTES_DIR: &str = "remotes";

#[derive(Debug, new)]
pub struct Remotes {
    /// Path to the metadata directory
    path: Box<Path>,
}

impl Remotes {
    pub fn exists(&self, name: &str) -> bool {
        self.remote_path(name).is_file()
    }

    pub fn add(&self, remote: &Remote) -> anyhow::Result<()> {
        if self.exists(remote.name()) {
            return Err(BitletError::RemoteExists(remote.name().to_string()).into());
        }

        write_locked(&self.remote_path(remote.name()), &remote.serialize()?)
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let path = self.remote_path(name);
        if !path.is_file() {
            return Err(BitletError::RemoteNotFound(name.to_string()).into());
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("failed to delete remote file at {:?}", path))
    }

    pub fn load(&self, name: &str) -> anyhow::Result<Remote> {
        let path = self.remote_path(name);
        if !path.is_file() {
            return Err(BitletError::RemoteNotFound(name.to_string()).into());
        }

        Remote::deserialize(Cursor::new(read_locked(&path)?))
            .with_context(|| format!("failed to parse remote file at {:?}", path))
    }

    pub fn remotes_path(&self) -> PathBuf {
        self.path.join(REMOTES_DIR)
    }

    fn remote_path(&self, name: &str) -> PathBuf {
        self.remotes_path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let remotes = Remotes::new(dir.path().to_path_buf().into_boxed_path());
        let remote = Remote::new("origin", "/srv/origin/.bitlet");

        remotes.add(&remote).unwrap();
        let error = remotes.add(&remote).unwrap_err();

        assert_eq!(remotes.load("origin").unwrap(), remote);
        assert_eq!(
            kind_of(&error),
            Some(&BitletError::RemoteExists("origin".to_string()))
        );
    }

    #[test]
    fn removing_an_unknown_remote_fails() {
        let dir = TempDir::new().unwrap();
        let remotes = Remotes::new(dir.path().to_path_buf().into_boxed_path());

        let error = remotes.remove("nope").unwrap_err();

        assert_eq!(
            kind_of(&error),
            Some(&BitletError::RemoteNotFound("nope".to_string()))
        );
    }
}
