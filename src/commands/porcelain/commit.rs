use crate::areas::repository::Repository;
use crate::errors::BitletError;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let summary = self.with_context(|context| {
            if context.stage.is_clean() {
                return Err(BitletError::NothingToCommit.into());
            }

            let message = message.trim();
            if message.is_empty() {
                return Err(BitletError::EmptyMessage.into());
            }

            let oid = self.write_commit(context, message.to_string(), None)?;
            let commit = self.load_commit(&context.history, &oid)?;

            Ok(format!(
                "[{} {}] {}",
                context.branch.name(),
                oid.to_short_oid(),
                commit.short_message()
            ))
        })?;

        writeln!(self.writer(), "{summary}")?;

        Ok(())
    }
}
