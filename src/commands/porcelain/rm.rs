use crate::areas::repository::Repository;
use crate::errors::BitletError;

impl Repository {
    /// Unstage a pending addition, and schedule a tracked file for removal,
    /// deleting its working copy.
    pub fn rm(&self, file: &str) -> anyhow::Result<()> {
        self.with_context(|context| {
            let tree = context.stage.tree_mut();
            let was_staged = tree.unstage(file);

            if !tree.is_tracked(file) {
                if !was_staged {
                    return Err(BitletError::NothingToRemove(file.to_string()).into());
                }

                return Ok(());
            }

            tree.mark_removed(file);
            self.workspace().remove_file(file)
        })
    }
}
