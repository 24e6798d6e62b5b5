use crate::areas::index::{Index, WorkspaceSnapshot};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn branches(&self) -> &[BranchName] {
        &self.branches
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let branches = self.repository.refs().list_branches()?;
        let current_branch = self.repository.refs().current_branch()?;
        let (_, head) = self.repository.head_commit()?;
        let workspace = self.repository.workspace().snapshot()?;

        let mut workspace_changeset = ChangeSet::new();
        self.check_staged_files(index, &workspace, &mut workspace_changeset);
        self.check_head_files(&head, index, &workspace, &mut workspace_changeset);

        Ok(StatusInfo {
            branches,
            current_branch,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            workspace_changeset,
            untracked_files: index.untracked_files(&workspace, &head),
        })
    }

    /// Staged files edited or deleted since they were staged
    fn check_staged_files(
        &self,
        index: &Index,
        workspace: &WorkspaceSnapshot,
        changeset: &mut ChangeSet,
    ) {
        for (path, staged_oid) in index.additions() {
            match workspace.get(path) {
                None => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != staged_oid => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }
    }

    /// Tracked files edited or deleted without being staged
    fn check_head_files(
        &self,
        head: &Commit,
        index: &Index,
        workspace: &WorkspaceSnapshot,
        changeset: &mut ChangeSet,
    ) {
        let unstaged = head.files().iter().filter(|(path, _)| {
            index.addition(path).is_none() && !index.is_staged_for_removal(path)
        });

        for (path, head_oid) in unstaged {
            match workspace.get(path) {
                None => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != head_oid => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }
    }
}
