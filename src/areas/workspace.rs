use crate::areas::index::WorkspaceSnapshot;
use crate::areas::repository::REPOSITORY_DIR;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository-relative form of a path given on the command line
    ///
    /// `.` components are dropped and `..` steps back one directory. Paths
    /// that leave the working tree, reach into the repository directory or
    /// contain a line break are rejected.
    pub fn normalize(file: &str) -> anyhow::Result<PathBuf> {
        if file.contains('\n') {
            anyhow::bail!(RepositoryError::UnsupportedFileName(PathBuf::from(file)));
        }

        let mut normalized = PathBuf::new();
        for component in Path::new(file).components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        anyhow::bail!(RepositoryError::OutsideWorkingTree(PathBuf::from(file)));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    anyhow::bail!(RepositoryError::OutsideWorkingTree(PathBuf::from(file)));
                }
            }
        }

        if normalized.starts_with(REPOSITORY_DIR) {
            anyhow::bail!(RepositoryError::OutsideWorkingTree(normalized));
        }

        Ok(normalized)
    }

    /// Every regular file in the working tree, sorted, relative to its root
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == REPOSITORY_DIR)
    }

    /// Blob ID of every working file, as if each were staged right now
    pub fn snapshot(&self) -> anyhow::Result<WorkspaceSnapshot> {
        self.list_files()?
            .into_iter()
            .map(|file| {
                let oid = self.parse_blob(&file)?.object_id()?;
                Ok((file, oid))
            })
            .collect()
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(file_path.to_path_buf(), data))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    /// Overwrite (or create) a working file, creating missing parent directories
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            self.make_directory(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file if present, then any directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }
        self.prune_empty_parent_dirs(&full_path)
    }

    /// Carry out a planned migration: deletions first, then writes
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete)?;
        self.apply_migration_action_set(migration, ActionType::Write)?;

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
    ) -> anyhow::Result<()> {
        migration
            .actions()
            .get(&action)
            .ok_or_else(|| anyhow::anyhow!("Invalid action type"))?
            .iter()
            .try_for_each(|(file_path, data)| match (&action, data) {
                (ActionType::Delete, None) => self.remove_file(file_path),
                (ActionType::Write, Some(data)) => self.write_file(file_path, data),
                _ => Err(anyhow::anyhow!("Invalid action and entry combination")),
            })
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a plain file standing where a directory is needed gets replaced
        for ancestor in dir_path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            if ancestor.starts_with(self.path.as_ref()) && ancestor.is_file() {
                std::fs::remove_file(ancestor)
                    .with_context(|| format!("Failed to remove file: {:?}", ancestor))?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))?;

        Ok(())
    }
}
