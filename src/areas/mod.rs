//! Core repository components
//!
//! - `database`: content-addressed object store
//! - `workspace`: the user's working files
//! - `refs`: branch records and the HEAD pointer
//! - `stages`: one persisted staging area per branch
//! - `histories`: the commit registry, plus cached copies of remote ones
//! - `remotes`: named links to other repositories on the same file system
//! - `repository`: coordination of the above and the per-operation context

pub mod database;
pub mod histories;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod stages;
pub mod workspace;

use anyhow::Context;
use fake::rand;
use file_guard::Lock;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Replace a metadata file: the content goes to a locked sibling temp file
/// which is then renamed over `path`. Temp names start with a dot, which no
/// branch or remote name may.
pub(crate) fn write_locked(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("failed to find parent directory of {:?}", path))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create parent directories for {:?}", path))?;

    let temp_path = parent.join(format!(".tmp-{}", rand::random::<u32>()));
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to open {:?}", temp_path))?;
        let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content)?;
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("failed to move {:?} into place", path))?;

    Ok(())
}

/// Read a metadata file under a shared lock.
pub(crate) fn read_locked(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("failed to open {:?}", path))?;
    let mut lock = file_guard::lock(&mut file, Lock::Shared, 0, 1)?;

    let mut content = Vec::new();
    lock.deref_mut().read_to_end(&mut content)?;

    Ok(content)
}
