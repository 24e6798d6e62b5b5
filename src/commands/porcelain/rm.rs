use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::errors::RepositoryError;

impl Repository {
    /// Unstage `file`, and if the head commit tracks it, stage its removal
    /// and delete the working copy
    pub fn rm(&self, file: &str) -> anyhow::Result<()> {
        let path = Workspace::normalize(file)?;

        let mut index = self.index_mut();
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let was_staged = index.addition(&path).is_some();

        if !was_staged && !head.tracks(&path) {
            anyhow::bail!(RepositoryError::NoReasonToRemove(path));
        }

        index.unstage(&path);
        if head.tracks(&path) {
            index.remove(path.clone());
            self.workspace().remove_file(&path)?;
        }

        index.write_updates()?;

        Ok(())
    }
}
