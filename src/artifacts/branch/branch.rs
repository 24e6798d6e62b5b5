use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use derive_new::new;

/// A named pointer to a head commit
///
/// The branch's history is not stored; [`Branch::path`] walks it from the
/// head each time, so it always reflects the current pointer.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Branch {
    name: BranchName,
    head: ObjectId,
}

impl Branch {
    /// Read the branch called `name`, failing with `NoSuchBranch` if absent
    pub fn load(repository: &Repository, name: &BranchName) -> anyhow::Result<Self> {
        match repository.refs().read_branch(name)? {
            Some(head) => Ok(Branch::new(name.clone(), head)),
            None => anyhow::bail!(RepositoryError::NoSuchBranch(name.to_string())),
        }
    }

    /// The active branch
    pub fn current(repository: &Repository) -> anyhow::Result<Self> {
        Self::load(repository, &repository.refs().current_branch()?)
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    /// Commits from the head back to the root, newest first
    pub fn path<'r>(&self, repository: &'r Repository) -> RevList<'r> {
        RevList::new(repository, self.head.clone())
    }
}
