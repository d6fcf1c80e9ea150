use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

pub type FileSet = BTreeSet<String>;
pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;

/// Snapshot of everything `status` reports, each section sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged: FileSet,
    pub(crate) removed: FileSet,
    pub(crate) unstaged_changes: ChangeSet,
    pub(crate) untracked: FileSet,
}

impl StatusInfo {
    pub fn collect(
        current_branch: BranchName,
        mut branches: Vec<BranchName>,
        tree: &Tree,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        branches.sort();

        let files = workspace.list_files()?;
        let mut unstaged_changes = ChangeSet::new();

        for (name, staged_oid) in tree.staged() {
            if !files.contains(name) {
                unstaged_changes.insert(name.clone(), WorkspaceChangeType::Deleted);
            } else if &workspace.blob_oid(name)? != staged_oid {
                unstaged_changes.insert(name.clone(), WorkspaceChangeType::Modified);
            }
        }

        for (name, tracked_oid) in tree.tracked() {
            if tree.is_staged(name) || tree.is_removed(name) {
                continue;
            }

            if !files.contains(name) {
                unstaged_changes.insert(name.clone(), WorkspaceChangeType::Deleted);
            } else if &workspace.blob_oid(name)? != tracked_oid {
                unstaged_changes.insert(name.clone(), WorkspaceChangeType::Modified);
            }
        }

        // a file scheduled for removal that reappears is untracked again
        let untracked = files
            .into_iter()
            .filter(|name| !tree.is_staged(name))
            .filter(|name| !tree.is_tracked(name) || tree.is_removed(name))
            .collect();

        Ok(StatusInfo {
            current_branch,
            branches,
            staged: tree.staged().keys().cloned().collect(),
            removed: tree.removed().clone(),
            unstaged_changes,
            untracked,
        })
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        Self::section(&mut output, "Branches", self.branches.iter().map(|branch| {
            if branch == &self.current_branch {
                format!("{}{}", "*".green(), branch)
            } else {
                branch.to_string()
            }
        }));
        Self::section(&mut output, "Staged Files", self.staged.iter().cloned());
        Self::section(&mut output, "Removed Files", self.removed.iter().cloned());
        Self::section(
            &mut output,
            "Modifications Not Staged For Commit",
            self.unstaged_changes
                .iter()
                .map(|(name, change)| format!("{name} {change}")),
        );
        Self::section(&mut output, "Untracked Files", self.untracked.iter().cloned());

        output
    }

    fn section(output: &mut String, title: &str, lines: impl Iterator<Item = String>) {
        let _ = writeln!(output, "=== {title} ===");
        for line in lines {
            let _ = writeln!(output, "{line}");
        }
        let _ = writeln!(output);
    }
}
