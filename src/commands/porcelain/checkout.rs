use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::RevisionContext;
use crate::artifacts::checkout::migration::{Migration, RemovalScope};
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Restore `file` to its version in the active head commit
    pub fn checkout_file(&self, file: &str) -> anyhow::Result<()> {
        let (_, head) = self.head_commit()?;

        self.restore_file(&head, file)
    }

    /// Restore `file` to its version in the commit named by `commit_id`
    pub fn checkout_file_at(&self, commit_id: &str, file: &str) -> anyhow::Result<()> {
        let (_, commit) = RevisionContext::new(self).resolve_commit(commit_id)?;

        self.restore_file(&commit, file)
    }

    fn restore_file(&self, commit: &Commit, file: &str) -> anyhow::Result<()> {
        let path = Workspace::normalize(file)?;
        let blob_id = commit
            .blob_id(&path)
            .ok_or_else(|| RepositoryError::NotTrackedInCommit(path.clone()))?;

        let data = self.database().get_blob(blob_id)?;
        self.workspace().write_file(&path, &data)?;
        tracing::debug!(path = %path.display(), %blob_id, "restored file");

        Ok(())
    }

    /// Make `target` the active branch and the working directory its head
    pub fn checkout_branch(&self, target: &str) -> anyhow::Result<()> {
        let target_name = BranchName::try_parse(target.to_string())
            .map_err(|_| RepositoryError::NoSuchBranch(target.to_string()))?;
        let target_branch = Branch::load(self, &target_name)?;

        if self.refs().is_current_branch(&target_name)? {
            anyhow::bail!(RepositoryError::AlreadyOnBranch(target.to_string()));
        }

        let current_branch = Branch::current(self)?;
        let current = self.database().get_commit(current_branch.head())?;
        let target_commit = self.database().get_commit(target_branch.head())?;

        let mut index = self.index_mut();
        index.rehydrate()?;

        let mut migration = Migration::new(
            self,
            &current,
            &target_commit,
            RemovalScope::PreviouslyTracked,
        );
        migration.apply_changes(&index)?;

        self.refs().set_head(&target_name)?;
        index.clear();
        index.write_updates()?;

        writeln!(self.writer(), "Switched to branch '{}'", target_name)?;

        Ok(())
    }
}
