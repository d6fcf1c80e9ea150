//! Typed failures surfaced to the user
//!
//! Every precondition a command can violate maps to one variant. Commands
//! return them through `anyhow::Result`, so callers that care about the
//! kind recover it with `downcast_ref::<BitletError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitletError {
    #[error("Not in an initialized Bitlet directory.")]
    NotInitialized,

    #[error("A Bitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Object {0} is missing from the object store.")]
    ObjectNotFound(String),

    #[error("File {0} does not exist.")]
    FileNotFound(String),

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("A branch named {0} already exists.")]
    BranchExists(String),

    #[error("A branch named {0} does not exist.")]
    BranchNotFound(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id prefix {0} is ambiguous.")]
    AmbiguousCommitId(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("Found no commit with that message.")]
    NoMatchingCommit,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<String>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("Encountered a merge conflict.")]
    MergeConflict,

    #[error("A remote named {0} already exists.")]
    RemoteExists(String),

    #[error("Invalid remote name: {0}")]
    InvalidRemoteName(String),

    #[error("Remote {0} not found.")]
    RemoteNotFound(String),

    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound(String),

    #[error("Please pull down remote changes before pushing.")]
    RemoteDiverged,

    #[error("Corrupt repository data: {0}")]
    Corrupt(String),
}

/// Recover the typed failure from an `anyhow` chain, if there is one.
pub fn kind_of(error: &anyhow::Error) -> Option<&BitletError> {
    error.chain().find_map(|cause| cause.downcast_ref::<BitletError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn typed_error_survives_added_context() {
        let result: anyhow::Result<()> =
            Err(BitletError::RemoteDiverged).context("while pushing to origin");
        let error = result.unwrap_err();

        assert_eq!(kind_of(&error), Some(&BitletError::RemoteDiverged));
    }

    #[test]
    fn untyped_errors_have_no_kind() {
        let error = anyhow::anyhow!("disk on fire");

        assert_eq!(kind_of(&error), None);
    }
}
