use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;

impl Repository {
    /// Create `branch_name` at the active head, without switching to it
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let source_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &source_oid)?;

        Ok(())
    }

    /// Delete the pointer `branch_name`; its commits stay in the store
    pub fn rm_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::NoSuchBranch(branch_name.to_string()))?;

        if !self.refs().branch_exists(&name) {
            anyhow::bail!(RepositoryError::NoSuchBranch(branch_name.to_string()));
        }
        if self.refs().is_current_branch(&name)? {
            anyhow::bail!(RepositoryError::CannotRemoveActiveBranch(
                branch_name.to_string()
            ));
        }

        self.refs().delete_branch(&name)?;

        Ok(())
    }
}
