//! Staging area
//!
//! The staging area records what the next commit will change relative to the
//! active head commit:
//!
//! - `additions`: paths mapped to the blob ID that will be tracked for them
//! - `removals`: paths that will stop being tracked
//!
//! A path is never in both at once. The whole area is loaded and written back
//! as a single checksummed record (see `artifacts::index` for the layout).

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, OID_SIZE, PATH_LENGTH_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use byteorder::ByteOrder;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Working tree snapshot: every file mapped to the blob ID its current
/// content would get
pub type WorkspaceSnapshot = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging file (typically `.twig/index`)
    path: Box<Path>,
    /// Paths staged for addition
    additions: BTreeMap<PathBuf, ObjectId>,
    /// Paths staged for removal
    removals: BTreeSet<PathBuf>,
    /// Whether the area differs from what is on disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    pub fn addition(&self, path: &Path) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Stage `path` for addition with the given blob
    ///
    /// If the path is staged for removal, the removal is cancelled instead and
    /// nothing is added.
    pub fn add(&mut self, path: PathBuf, oid: ObjectId) {
        if self.removals.remove(&path) {
            tracing::debug!(path = %path.display(), "cancelled pending removal");
        } else {
            self.additions.insert(path, oid);
        }

        self.changed = true;
    }

    /// Drop a pending addition, if any
    pub fn unstage(&mut self, path: &Path) -> bool {
        let unstaged = self.additions.remove(path).is_some();
        self.changed |= unstaged;

        unstaged
    }

    /// Stage `path` for removal, dropping any pending addition
    pub fn remove(&mut self, path: PathBuf) {
        self.additions.remove(&path);
        self.removals.insert(path);

        self.changed = true;
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.additions.clear();
        self.removals.clear();
    }

    /// Files present in the working tree that `commit` would not account for
    ///
    /// A file is untracked unless it is staged for addition with its current
    /// content, or tracked by `commit` and not staged for removal.
    pub fn untracked_files(
        &self,
        workspace: &WorkspaceSnapshot,
        commit: &Commit,
    ) -> BTreeSet<PathBuf> {
        workspace
            .iter()
            .filter(|(path, oid)| self.additions.get(path.as_path()) != Some(*oid))
            .filter(|(path, _)| !commit.tracks(path) || self.removals.contains(path.as_path()))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Load the staging area from disk
    ///
    /// A missing or empty file is an empty staging area. The record is read
    /// under a shared lock and its checksum verified.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("Unable to open staging file {}", self.path.display()))?;
        if index_file.metadata()?.len() == 0 {
            return Ok(());
        }
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut reader = Checksum::new(&mut *lock);
        let header = self.parse_header(&mut reader)?;
        self.parse_additions(header.additions_count, &mut reader)?;
        self.parse_removals(header.removals_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(&self, reader: &mut Checksum<impl Read>) -> anyhow::Result<IndexHeader> {
        let header = IndexHeader::parse(&reader.read(HEADER_SIZE)?)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid staging file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported staging file version: {}",
                header.version
            ));
        }

        Ok(header)
    }

    fn parse_additions(&mut self, count: u32, reader: &mut Checksum<impl Read>) -> anyhow::Result<()> {
        for _ in 0..count {
            let oid_bytes = reader.read(OID_SIZE)?;
            let oid = ObjectId::read_h40_from(&mut oid_bytes.as_ref())?;
            let path = Self::parse_path(reader)?;

            self.additions.insert(path, oid);
        }

        Ok(())
    }

    fn parse_removals(&mut self, count: u32, reader: &mut Checksum<impl Read>) -> anyhow::Result<()> {
        for _ in 0..count {
            let path = Self::parse_path(reader)?;
            self.removals.insert(path);
        }

        Ok(())
    }

    fn parse_path(reader: &mut Checksum<impl Read>) -> anyhow::Result<PathBuf> {
        let length = byteorder::NetworkEndian::read_u16(&reader.read(PATH_LENGTH_SIZE)?);
        let path = reader.read(length as usize)?;
        let path = String::from_utf8(path.to_vec()).context("Staged path is not valid UTF-8")?;

        Ok(PathBuf::from(path))
    }

    /// Persist the staging area
    ///
    /// The record is written to a temporary sibling file and renamed over the
    /// staging file, so a crash never leaves a half-written record behind.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let temp_path = self.path.with_extension(format!(
            "tmp-{}",
            fake::rand::random::<u32>()
        ));

        {
            let mut index_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Unable to open staging file {}", temp_path.display()))?;
            let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;
            let mut writer = Checksum::new(&mut *lock);

            let header = IndexHeader {
                additions_count: self.additions.len() as u32,
                removals_count: self.removals.len() as u32,
                ..IndexHeader::empty()
            };
            writer.write(&header.serialize()?)?;

            for (path, oid) in &self.additions {
                let mut entry = Vec::with_capacity(OID_SIZE);
                oid.write_h40_to(&mut entry)?;
                writer.write(&entry)?;
                writer.write(&Self::encode_path(path)?)?;
            }

            for path in &self.removals {
                writer.write(&Self::encode_path(path)?)?;
            }

            writer.seal()?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to replace staging file {}", self.path.display()))?;
        self.changed = false;

        tracing::debug!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "wrote staging area"
        );

        Ok(())
    }

    fn encode_path(path: &Path) -> anyhow::Result<Vec<u8>> {
        let path = path.to_string_lossy();
        let length = u16::try_from(path.len())
            .map_err(|_| anyhow!("Path is too long to stage: {}", path))?;

        let mut bytes = Vec::with_capacity(PATH_LENGTH_SIZE + path.len());
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.extend_from_slice(path.as_bytes());

        Ok(bytes)
    }
}
