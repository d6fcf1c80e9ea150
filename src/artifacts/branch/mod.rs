//! Branches
//!
//! A branch is a named pointer to a head commit plus the append-only log of
//! every commit that was ever its head, oldest first.

pub mod branch;
pub mod branch_name;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/|\.\.|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Separator users write between a remote and one of its branches
pub const REMOTE_BRANCH_SEPARATOR: char = '/';
/// Separator used in the stored name of a fetched branch
pub const STORED_REMOTE_BRANCH_SEPARATOR: char = '-';

pub const DEFAULT_BRANCH: &str = "master";
