use crate::artifacts::branch::{
    INVALID_BRANCH_NAME_REGEX, REMOTE_BRANCH_SEPARATOR, STORED_REMOTE_BRANCH_SEPARATOR,
};
use crate::errors::BitletError;
use regex::Regex;
use std::sync::LazyLock;

static INVALID_BRANCH_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(INVALID_BRANCH_NAME_REGEX).ok());

/// Validated branch name, usable as a file name under `.bitlet/branches`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        let Some(invalid) = INVALID_BRANCH_NAME.as_ref() else {
            anyhow::bail!("invalid branch name pattern: {INVALID_BRANCH_NAME_REGEX}");
        };

        if name.is_empty() || invalid.is_match(&name) {
            return Err(BitletError::InvalidBranchName(name).into());
        }

        Ok(BranchName(name))
    }

    /// Parse a name as users type it, where `origin/master` designates the
    /// locally stored `origin-master`.
    pub fn from_spelling(spelling: &str) -> anyhow::Result<Self> {
        let stored = spelling
            .chars()
            .map(|c| match c {
                REMOTE_BRANCH_SEPARATOR => STORED_REMOTE_BRANCH_SEPARATOR,
                other => other,
            })
            .collect();

        Self::try_parse(stored)
    }

    /// Name under which a branch fetched from `remote` is stored locally.
    pub fn for_remote(remote: &str, branch: &BranchName) -> anyhow::Result<Self> {
        Self::try_parse(format!("{remote}{STORED_REMOTE_BRANCH_SEPARATOR}{branch}"))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
