use crate::areas::repository::Repository;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// History of the active branch, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        let branch = Branch::current(self)?;

        for entry in branch.path(self) {
            let (commit_oid, commit) = entry?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Every commit ever made, ordered by hash
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_oid in self.graph().all()? {
            let commit = self.database().get_commit(&commit_oid)?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(
            writer,
            "{}",
            format!("commit {}", commit_oid).yellow()
        )?;
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
