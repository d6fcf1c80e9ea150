//! Working-tree migrations
//!
//! Checkout, reset and fast-forward merges all move the working directory
//! from the current branch's tracked files to another snapshot. The whole
//! move is planned first; untracked files that would be clobbered abort the
//! operation before any file is touched.

pub mod conflict;
pub mod migration;
