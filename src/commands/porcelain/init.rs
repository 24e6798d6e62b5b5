use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!(RepositoryError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        let master = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        let root = Commit::root(master.clone())?;
        let root_oid = self.database().put_commit(&root)?;
        self.graph().register(root_oid.clone())?;

        self.refs()
            .create_branch(&master, &root_oid)
            .context("Failed to create default branch")?;
        self.refs()
            .set_head(&master)
            .context("Failed to create initial HEAD reference")?;

        self.index_mut()
            .write_updates()
            .context("Failed to create .twig/index file")?;

        writeln!(
            self.writer(),
            "Initialized empty twig repository in {}",
            self.twig_path().display()
        )?;

        Ok(())
    }
}
