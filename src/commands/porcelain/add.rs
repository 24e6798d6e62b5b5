use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;

impl Repository {
    /// Stage the current content of `file`
    ///
    /// A file staged for removal only has the removal cancelled. A file whose
    /// content matches the head commit ends up unstaged.
    pub fn add(&self, file: &str) -> anyhow::Result<()> {
        let path = Workspace::normalize(file)?;
        if !self.workspace().exists(&path) {
            anyhow::bail!(RepositoryError::FileNotFound(path));
        }

        let mut index = self.index_mut();
        // Load the index file from the disk
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;

        if index.is_staged_for_removal(&path) {
            index.add(path, blob_id);
        } else if head.blob_id(&path) == Some(&blob_id) {
            index.unstage(&path);
        } else {
            self.database().store(&blob)?;
            index.add(path, blob_id);
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
