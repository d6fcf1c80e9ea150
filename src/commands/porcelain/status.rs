use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        self.inspect_context(|context| {
            let status = StatusInfo::collect(
                context.branch.name().clone(),
                self.refs().list_branches()?,
                context.stage.tree(),
                self.workspace(),
            )?;

            write!(self.writer(), "{}", status.render())?;

            Ok(())
        })
    }
}
