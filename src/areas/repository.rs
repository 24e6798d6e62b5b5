use crate::areas::database::Database;
use crate::areas::graph::Graph;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::errors::RepositoryError;
use anyhow::Context;
use file_guard::{FileGuard, Lock};
use std::cell::{Ref, RefCell, RefMut};
use std::fs::File;
use std::path::Path;

/// Name of the repository directory inside the working tree
pub const REPOSITORY_DIR: &str = ".twig";

/// Name of the repository lock file
const LOCK_FILE: &str = "lock";

/// Everything a command needs, resolved from one working-tree root
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    graph: Graph,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve working tree {}", path.display()))?;
        let twig_path = path.join(REPOSITORY_DIR);

        let index = Index::new(twig_path.join("index").into_boxed_path());
        let database = Database::new(twig_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(twig_path.clone().into_boxed_path());
        let graph = Graph::new(twig_path.join("graph").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            graph,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn twig_path(&self) -> Box<Path> {
        self.path.join(REPOSITORY_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.twig_path().is_dir()
    }

    /// Fail with `UninitializedRepository` unless `init` has run here
    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            anyhow::bail!(RepositoryError::UninitializedRepository);
        }

        Ok(())
    }

    /// Take the repository-wide exclusive lock
    ///
    /// Blocks until any other process holding it is done. The lock is
    /// released when the guard is dropped.
    pub fn lock(&self) -> anyhow::Result<FileGuard<Box<File>>> {
        let lock_path = self.twig_path().join(LOCK_FILE);
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Unable to open repository lock {}", lock_path.display()))?;

        let guard = file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock repository {}", lock_path.display()))?;
        tracing::debug!(path = %lock_path.display(), "acquired repository lock");

        Ok(guard)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Ref<'_, Index> {
        self.index.borrow()
    }

    pub fn index_mut(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Status report for the given (already loaded) staging area
    pub fn status_info(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        Status::new(self).initialize(index)
    }

    /// ID and body of the active branch's head commit
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head()?;
        let head = self.database.get_commit(&head_oid)?;

        Ok((head_oid, head))
    }
}
