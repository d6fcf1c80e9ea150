use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;

impl Repository {
    pub fn hash_object(&self, file: &str, write: bool) -> anyhow::Result<()> {
        let blob = self.workspace().parse_blob(file)?;
        let object_id = blob.object_id()?;

        writeln!(self.writer(), "{object_id}")?;

        if !write {
            return Ok(());
        }

        self.ensure_initialized()?;
        self.database().store(&blob)?;

        Ok(())
    }
}
