//! Command implementations
//!
//! Commands are split the way git splits them:
//!
//! - `plumbing`: direct object store access (hash-object, cat-file)
//! - `porcelain`: the version control workflow (add, commit, merge, push, ...)
//!
//! Every command is an `impl Repository` block. Porcelain commands run inside
//! a repository context, so a failing precondition leaves nothing changed.

pub mod plumbing;
pub mod porcelain;
