use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        if message.is_empty() {
            anyhow::bail!(RepositoryError::EmptyCommitMessage);
        }

        let mut index = self.index_mut();
        // Load the index file from the disk
        index.rehydrate()?;

        if index.is_empty() {
            anyhow::bail!(RepositoryError::NothingToCommit);
        }

        let branch = self.refs().current_branch()?;
        let (head_oid, head) = self.head_commit()?;

        let commit = Commit::child_of(
            head_oid,
            &head,
            message.to_string(),
            branch.clone(),
            index.additions(),
            index.removals(),
        )?;
        let commit_id = commit.object_id()?;
        if self.graph().contains(&commit_id)? {
            anyhow::bail!("Commit {} already exists", commit_id);
        }

        // objects first, then the pointers that make them reachable
        self.database().put_commit(&commit)?;
        self.graph().register(commit_id.clone())?;
        self.refs().update_head(&commit_id)?;

        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch,
            commit_id.to_short_oid(),
            commit.message().lines().next().unwrap_or_default()
        )?;

        Ok(())
    }
}
