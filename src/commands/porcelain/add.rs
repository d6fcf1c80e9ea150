use crate::areas::repository::Repository;

impl Repository {
    /// Stage the working version of each file. Staging a file scheduled for
    /// removal only withdraws the removal.
    pub fn add(&self, files: &[String]) -> anyhow::Result<()> {
        self.with_context(|context| {
            for file in files {
                if context.stage.tree_mut().cancel_removal(file) {
                    tracing::debug!(file = %file, "removal withdrawn");
                    continue;
                }

                let blob = self.workspace().parse_blob(file)?;
                let oid = self.database().store(&blob)?;
                context.stage.tree_mut().stage(file, oid);
            }

            Ok(())
        })
    }
}
