use colored::Colorize;

/// Change to a file that is not reflected in the staging area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "(modified)",
            WorkspaceChangeType::Deleted => "(deleted)",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "{}", label.red())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_parenthesized() {
        let modified: &str = (&WorkspaceChangeType::Modified).into();
        let deleted: &str = (&WorkspaceChangeType::Deleted).into();

        assert_eq!(modified, "(modified)");
        assert_eq!(deleted, "(deleted)");
    }
}
