use crate::areas::repository::{Repository, RepositoryContext};
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::UntrackedConflicts;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::reconcile::{FileMergeAction, MergePlan, ThreeWayMerge, conflict_content};
use crate::artifacts::stage::staging_area::StagingArea;
use crate::errors::BitletError;

const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const UP_TO_DATE_NOTICE: &str = "Given branch is an ancestor of the current branch.";

impl Repository {
    /// Merge the branch spelled `given` into the current branch.
    pub fn merge(&self, given: &str) -> anyhow::Result<MergeOutcome> {
        let outcome = self.with_context(|context| self.merge_into_current(context, given))?;
        self.report_merge(&outcome)?;

        Ok(outcome)
    }

    pub(crate) fn merge_into_current(
        &self,
        context: &mut RepositoryContext,
        given: &str,
    ) -> anyhow::Result<MergeOutcome> {
        if !context.stage.is_clean() {
            return Err(BitletError::UncommittedChanges.into());
        }

        let given_name = BranchName::from_spelling(given)?;
        let given_branch = self.refs().load_branch(&given_name)?;
        if &given_name == context.branch.name() {
            return Err(BitletError::MergeWithSelf.into());
        }

        let split = self
            .config()
            .merge_base()
            .merge_base(&context.history, &context.branch, &given_branch)?;
        tracing::debug!(split = %split.to_short_oid(), given = %given_name, "found merge base");

        // equal heads are up to date, not a fast-forward
        if &split == given_branch.head() {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if &split == context.branch.head() {
            return self.fast_forward(context, &given_branch);
        }

        let split_tree = self.load_commit_tree(&self.load_commit(&context.history, &split)?)?;
        let current_head = self.load_commit(&context.history, context.branch.head())?;
        let current_tree = self.load_commit_tree(&current_head)?;
        let given_head = self.load_commit(&context.history, given_branch.head())?;
        let given_tree = self.load_commit_tree(&given_head)?;

        let plan = ThreeWayMerge::new(
            split_tree.tracked(),
            current_tree.tracked(),
            given_tree.tracked(),
        )
        .plan();

        self.check_untracked(context, &plan)?;
        let conflicted = self.apply_merge_plan(context, plan)?;

        let message = format!("Merged {} into {}.", given, context.branch.name());
        let commit = self.write_commit(context, message, Some(&given_head))?;

        Ok(MergeOutcome::Merged { commit, conflicted })
    }

    fn fast_forward(
        &self,
        context: &mut RepositoryContext,
        given: &Branch,
    ) -> anyhow::Result<MergeOutcome> {
        let head = self.load_commit(&context.history, given.head())?;
        let tree = self.load_commit_tree(&head)?;

        Migration::new(self.database(), self.workspace())
            .run(context.stage.tree(), tree.tracked())?;

        context.branch.fast_forward_to(given);
        context.stage = StagingArea::new(context.branch.name().clone(), tree.tracked().clone());

        Ok(MergeOutcome::FastForward {
            head: given.head().clone(),
        })
    }

    fn check_untracked(&self, context: &RepositoryContext, plan: &MergePlan) -> anyhow::Result<()> {
        let mut conflicts = UntrackedConflicts::new(self.workspace());

        for (file, action) in plan {
            match action {
                FileMergeAction::TakeGiven(oid) => {
                    conflicts.check(context.stage.tree(), file, Some(oid))?
                }
                FileMergeAction::Conflict { .. } => {
                    conflicts.check(context.stage.tree(), file, None)?
                }
                FileMergeAction::RemoveFile | FileMergeAction::KeepCurrent => {}
            }
        }

        conflicts.into_result()
    }

    /// Write the merged files and stage them. Returns whether any file conflicted.
    fn apply_merge_plan(
        &self,
        context: &mut RepositoryContext,
        plan: MergePlan,
    ) -> anyhow::Result<bool> {
        let mut conflicted = false;

        for (file, action) in plan {
            match action {
                FileMergeAction::TakeGiven(oid) => {
                    let content = self.database().get(&oid)?;
                    self.workspace().write_file(&file, &content)?;
                    context.stage.tree_mut().stage(&file, oid);
                }
                FileMergeAction::RemoveFile => {
                    self.workspace().remove_file(&file)?;
                    context.stage.tree_mut().mark_removed(&file);
                }
                FileMergeAction::Conflict { current, given } => {
                    let current = current.map(|oid| self.database().get(&oid)).transpose()?;
                    let given = given.map(|oid| self.database().get(&oid)).transpose()?;

                    let content = conflict_content(current.as_deref(), given.as_deref());
                    self.workspace().write_file(&file, &content)?;
                    let oid = self.database().put(content)?;
                    context.stage.tree_mut().stage(&file, oid);

                    tracing::debug!(file = %file, "merge conflict");
                    conflicted = true;
                }
                FileMergeAction::KeepCurrent => {}
            }
        }

        Ok(conflicted)
    }

    pub(crate) fn report_merge(&self, outcome: &MergeOutcome) -> anyhow::Result<()> {
        match outcome {
            MergeOutcome::FastForward { .. } => writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?,
            MergeOutcome::AlreadyUpToDate => writeln!(self.writer(), "{UP_TO_DATE_NOTICE}")?,
            MergeOutcome::Merged { conflicted, .. } => {
                if *conflicted {
                    writeln!(self.writer(), "{}", BitletError::MergeConflict)?;
                }
            }
        }

        Ok(())
    }
}
