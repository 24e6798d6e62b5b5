//! Branch pointers and HEAD
//!
//! Every branch is a file under `refs/heads/` holding the 40-character hash of
//! its head commit. `HEAD` is a symbolic reference naming the active branch:
//!
//! ```text
//! ref: refs/heads/master
//! ```
//!
//! All writes go through a temporary sibling file that is renamed into place
//! while an exclusive lock is held on it.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the active branch
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .with_context(|| format!("HEAD is not a symbolic reference: {}", content.trim()))?;

        BranchName::try_parse_sym_ref_name(&SymRefName::new(symref_match[1].to_string()))
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(branch_name == &self.current_branch()?)
    }

    /// Point HEAD at `branch_name`
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, "switching active branch");

        self.update_ref_file(
            &self.head_path(),
            format!("ref: {}", branch_name.to_sym_ref_name().as_ref_path()),
        )
    }

    /// Head commit of the active branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;

        self.read_branch(&branch_name)?
            .with_context(|| format!("active branch {} has no head commit", branch_name))
    }

    /// Move the active branch to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_branch(&self.current_branch()?, oid)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    /// Head commit of `branch_name`, or `None` if there is no such branch
    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, %oid, "updating branch head");

        self.update_ref_file(&self.branch_path(branch_name), oid.to_string())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            anyhow::bail!(RepositoryError::BranchAlreadyExists(name.to_string()));
        }
        if self.clashes_with_existing_branch(name) {
            anyhow::bail!(RepositoryError::BranchPathConflict(name.to_string()));
        }

        self.update_branch(name, source_oid)
    }

    /// `feat/x` cannot live next to a branch `feat`, nor `feat` next to
    /// `feat/x`, because one would need a directory where the other is a file
    fn clashes_with_existing_branch(&self, name: &BranchName) -> bool {
        let branch_path = self.branch_path(name);
        let heads_path = self.heads_path();

        branch_path.is_dir()
            || branch_path
                .ancestors()
                .skip(1)
                .take_while(|ancestor| *ancestor != &*heads_path)
                .any(|ancestor| ancestor.is_file())
    }

    /// Delete a branch pointer and return the commit it pointed at
    ///
    /// The commits themselves stay in the object store.
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(name);

        match self.read_branch(name)? {
            Some(oid) => {
                std::fs::remove_file(&branch_path).with_context(|| {
                    format!("failed to delete branch file at {:?}", branch_path)
                })?;
                self.prune_branch_empty_parent_dirs(&branch_path)?;
                tracing::debug!(branch = %name, %oid, "deleted branch");

                Ok(oid)
            }
            None => anyhow::bail!(RepositoryError::NoSuchBranch(name.to_string())),
        }
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !Self::is_temp_file(entry.path()))
            .map(|entry| -> anyhow::Result<BranchName> {
                let relative_path = entry.path().strip_prefix(self.path.as_ref())?;
                let relative_path = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                BranchName::try_parse_sym_ref_name(&SymRefName::new(relative_path))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        let parent = path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?;
        std::fs::create_dir_all(parent)?;

        let file_name = path
            .file_name()
            .with_context(|| format!("invalid ref file path {:?}", path))?
            .to_string_lossy();
        let temp_path = parent.join(format!(
            ".{}.tmp-{}",
            file_name,
            fake::rand::random::<u32>()
        ));

        {
            let mut ref_file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
                .with_context(|| format!("failed to open ref file at {:?}", temp_path))?;
            let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
            lock.deref_mut().write_all(raw_ref.as_bytes())?;
        }

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to replace ref file at {:?}", path))?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    /// Temp files start with a dot, which no branch name component may
    fn is_temp_file(path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join(branch_name.to_sym_ref_name().as_ref_path())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        (dir, refs)
    }

    fn name(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    fn head_follows_the_active_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&name("master"), &oid('a')).unwrap();
        refs.set_head(&name("master")).unwrap();

        refs.update_head(&oid('b')).unwrap();

        assert_eq!(refs.current_branch().unwrap(), name("master"));
        assert_eq!(refs.read_head().unwrap(), oid('b'));
        assert_eq!(
            std::fs::read_to_string(refs.head_path()).unwrap(),
            "ref: refs/heads/master"
        );
    }

    #[rstest]
    fn duplicate_branch_is_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&name("dev"), &oid('a')).unwrap();

        let error = refs.create_branch(&name("dev"), &oid('b')).unwrap_err();

        assert_eq!(
            RepositoryError::from_anyhow(&error),
            Some(&RepositoryError::BranchAlreadyExists("dev".to_string()))
        );
        assert_eq!(refs.read_branch(&name("dev")).unwrap(), Some(oid('a')));
    }

    #[rstest]
    fn deleting_a_nested_branch_prunes_empty_directories(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&name("feature/login"), &oid('a')).unwrap();

        assert_eq!(refs.delete_branch(&name("feature/login")).unwrap(), oid('a'));
        assert!(!refs.heads_path().join("feature").exists());
    }

    #[rstest]
    fn deleting_a_missing_branch_is_a_user_error(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&name("ghost")).unwrap_err();

        assert_eq!(
            RepositoryError::from_anyhow(&error),
            Some(&RepositoryError::NoSuchBranch("ghost".to_string()))
        );
    }

    #[rstest]
    fn branches_are_listed_by_name(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        for branch in ["topic", "master", "feature/x"] {
            refs.create_branch(&name(branch), &oid('a')).unwrap();
        }

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![name("feature/x"), name("master"), name("topic")]
        );
    }

    #[rstest]
    fn branch_names_resembling_temp_files_are_listed(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&name("fix.tmp-1"), &oid('a')).unwrap();
        std::fs::write(refs.heads_path().join(".master.tmp-7"), "partial").unwrap();

        assert_eq!(refs.list_branches().unwrap(), vec![name("fix.tmp-1")]);
    }

    #[rstest]
    #[case("feat", "feat/x")]
    #[case("feat/x", "feat")]
    #[case("a/b/c", "a/b")]
    fn branch_nested_under_or_over_another_is_rejected(
        refs: (TempDir, Refs),
        #[case] existing: &str,
        #[case] clashing: &str,
    ) {
        let (_dir, refs) = refs;
        refs.create_branch(&name(existing), &oid('a')).unwrap();

        let error = refs.create_branch(&name(clashing), &oid('b')).unwrap_err();

        assert_eq!(
            RepositoryError::from_anyhow(&error),
            Some(&RepositoryError::BranchPathConflict(clashing.to_string()))
        );
        assert_eq!(refs.list_branches().unwrap(), vec![name(existing)]);
    }
}
