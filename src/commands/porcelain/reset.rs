use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::RevisionContext;
use crate::artifacts::checkout::migration::{Migration, RemovalScope};
use std::io::Write;

impl Repository {
    /// Move the active branch to `commit_id` and make the working directory
    /// match it exactly
    pub fn reset(&self, commit_id: &str) -> anyhow::Result<()> {
        let (target_oid, target) = RevisionContext::new(self).resolve_commit(commit_id)?;
        let (_, current) = self.head_commit()?;

        let mut index = self.index_mut();
        index.rehydrate()?;

        let mut migration =
            Migration::new(self, &current, &target, RemovalScope::AllWorkingFiles);
        migration.apply_changes(&index)?;

        self.refs().update_head(&target_oid)?;
        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            target_oid.to_short_oid(),
            target.message().lines().next().unwrap_or_default()
        )?;

        Ok(())
    }
}
