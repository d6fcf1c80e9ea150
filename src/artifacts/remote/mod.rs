//! Remotes: other repositories on the same file system
//!
//! ## File Format
//!
//! ```text
//! name <remote name>
//! path <path to the other repository>
//! ```

pub mod transfer;

use crate::areas::repository::{METADATA_DIR, Repository};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::BitletError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Remote {
    #[new(into)]
    name: String,
    #[new(into)]
    path: PathBuf,
}

impl Remote {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Working root of the remote repository. The registered path may name
    /// either the root or its metadata directory.
    pub fn root(&self) -> PathBuf {
        match self.path.file_name() {
            Some(name) if name == METADATA_DIR => self
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.path.clone()),
            _ => self.path.clone(),
        }
    }

    /// Open the remote repository. Its output is discarded.
    pub fn open(&self) -> anyhow::Result<Repository> {
        let root = self.root();
        if !root.join(METADATA_DIR).is_dir() {
            return Err(BitletError::RemoteNotFound(self.name.clone()).into());
        }

        let root = root
            .to_str()
            .with_context(|| format!("remote path {:?} is not valid UTF-8", root))?;

        Repository::new(root, Box::new(std::io::sink()))
    }
}

impl Packable for Remote {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(format!(
            "name {}\npath {}\n",
            self.name,
            self.path.display()
        )))
    }
}

impl Unpackable for Remote {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut name = None;
        let mut path = None;

        for line in reader.lines() {
            let line = line?;
            if let Some(value) = line.strip_prefix("name ") {
                name = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("path ") {
                path = Some(PathBuf::from(value));
            }
        }

        Ok(Remote {
            name: name.context("Invalid remote file: missing name")?,
            path: path.context("Invalid remote file: missing path")?,
        })
    }
}
