//! Checkout migration and untracked-file protection
//!
//! Moving the working directory from the active head commit to a target
//! commit happens in two phases:
//!
//! 1. Planning: compute which files to write and which to delete, and detect
//!    untracked files the target would overwrite
//! 2. Applying: touch the working directory, only if planning found no
//!    conflict
//!
//! Every lookup runs during planning, so an aborted migration leaves the
//! working directory exactly as it was.

use crate::areas::index::{Index, WorkspaceSnapshot};
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionType {
    /// Create or overwrite a file with a blob's content
    Write,
    /// Delete a file
    Delete,
}

/// Which working files a migration removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalScope {
    /// Files the previous head tracked that the target does not (branch checkout)
    PreviouslyTracked,
    /// Every working file the target does not track (reset)
    AllWorkingFiles,
}

/// Set of planned actions grouped by type, with the content to write
pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<Bytes>)>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    /// Head commit of the active branch before the migration
    current: &'r Commit,
    /// Commit whose file table the working directory will match
    target: &'r Commit,
    scope: RemovalScope,
    /// Planned file system actions
    actions: ActionsSet,
    /// Untracked files the target would overwrite
    conflicts: BTreeSet<PathBuf>,
}

impl<'r> Migration<'r> {
    pub fn new(
        repository: &'r Repository,
        current: &'r Commit,
        target: &'r Commit,
        scope: RemovalScope,
    ) -> Self {
        let actions = BTreeMap::from([
            (ActionType::Write, Vec::new()),
            (ActionType::Delete, Vec::new()),
        ]);

        Self {
            repository,
            current,
            target,
            scope,
            actions,
            conflicts: BTreeSet::new(),
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn apply_changes(&mut self, index: &Index) -> anyhow::Result<()> {
        self.plan_changes(index)?;
        self.repository.workspace().apply_migration(self)?;

        Ok(())
    }

    /// Compute the actions without touching the working directory
    ///
    /// Fails with `UntrackedFileWouldBeOverwritten` if any file untracked
    /// relative to the active branch is tracked by the target.
    pub fn plan_changes(&mut self, index: &Index) -> anyhow::Result<()> {
        let workspace = self.repository.workspace().snapshot()?;

        self.check_for_conflicts(index, &workspace);
        if !self.conflicts.is_empty() {
            tracing::debug!(conflicts = ?self.conflicts, "refusing to overwrite untracked files");
            anyhow::bail!(RepositoryError::UntrackedFileWouldBeOverwritten(
                self.conflicts.iter().cloned().collect()
            ));
        }

        self.record_writes(&workspace)?;
        self.record_deletions(&workspace);

        tracing::debug!(
            writes = self.actions[&ActionType::Write].len(),
            deletions = self.actions[&ActionType::Delete].len(),
            "planned checkout"
        );

        Ok(())
    }

    fn check_for_conflicts(&mut self, index: &Index, workspace: &WorkspaceSnapshot) {
        self.conflicts = index
            .untracked_files(workspace, self.current)
            .into_iter()
            .filter(|path| self.target.tracks(path))
            .collect();
    }

    /// Blob contents are read here so a missing object aborts before any write
    fn record_writes(&mut self, workspace: &WorkspaceSnapshot) -> anyhow::Result<()> {
        let writes = self
            .target
            .files()
            .iter()
            .filter(|(path, oid)| workspace.get(*path) != Some(*oid))
            .map(|(path, oid)| Ok((path.clone(), Some(self.load_blob_data(oid)?))))
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.actions.entry(ActionType::Write).or_default().extend(writes);

        Ok(())
    }

    fn record_deletions(&mut self, workspace: &WorkspaceSnapshot) {
        let candidates: Vec<PathBuf> = match self.scope {
            RemovalScope::PreviouslyTracked => self.current.files().keys().cloned().collect(),
            RemovalScope::AllWorkingFiles => workspace.keys().cloned().collect(),
        };

        let deletions = candidates
            .into_iter()
            .filter(|path| !self.target.tracks(path))
            .filter(|path| workspace.contains_key(path))
            .map(|path| (path, None));

        self.actions.entry(ActionType::Delete).or_default().extend(deletions);
    }

    fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        self.repository.database().get_blob(oid)
    }
}
