//! Porcelain commands
//!
//! ## Commands
//!
//! - `init`: create the metadata directory and the initial commit
//! - `add` / `rm`: stage a file, or schedule it for removal
//! - `commit`: freeze the staging area into a commit
//! - `log` / `global_log` / `find`: browse commits
//! - `status`: branches, staged and removed files, unstaged changes
//! - `branch` / `rm_branch`: create and delete branches
//! - `checkout`: restore files, switch branches, `reset` to a commit
//! - `merge`: merge another branch into the current one
//! - `remote`: add-remote, rm-remote, push, fetch, pull

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod remote;
pub mod rm;
pub mod status;
