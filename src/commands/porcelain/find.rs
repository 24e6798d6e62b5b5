use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Print the ID of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut matches = Vec::new();

        for commit_oid in self.graph().all()? {
            let commit = self.database().get_commit(&commit_oid)?;
            if commit.message() == message {
                matches.push(commit_oid);
            }
        }

        if matches.is_empty() {
            anyhow::bail!(RepositoryError::NoCommitWithMessage(message.to_string()));
        }

        for commit_oid in matches {
            writeln!(self.writer(), "{}", commit_oid)?;
        }

        Ok(())
    }
}
