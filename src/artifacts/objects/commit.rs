//! Commit object
//!
//! A commit is an immutable snapshot: a message, a timestamp, at most one
//! parent, the branch it was created on, and the full table of tracked files
//! (path to blob ID). Its ID covers only the message and timestamp.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>            (absent for the root commit)
//! branch <branch-name>
//! timestamp <rfc3339>
//! file <blob-sha> <path>         (one line per tracked file)
//!
//! <commit message>
//! ```

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Message of the commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Files tracked by a commit
pub type FileTable = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    message: String,
    timestamp: DateTime<FixedOffset>,
    parent: Option<ObjectId>,
    branch: BranchName,
    files: FileTable,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parent: Option<ObjectId>,
        branch: BranchName,
        files: FileTable,
    ) -> anyhow::Result<Self> {
        if message.is_empty() {
            anyhow::bail!(RepositoryError::EmptyCommitMessage);
        }

        Ok(Commit {
            message,
            timestamp,
            parent,
            branch,
            files,
        })
    }

    /// The parentless commit every repository starts from, stamped with the
    /// Unix epoch
    pub fn root(branch: BranchName) -> anyhow::Result<Self> {
        Self::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
            None,
            branch,
            FileTable::new(),
        )
    }

    /// Build the successor of `parent` from the staged changes
    ///
    /// The new commit starts from its own copy of the parent's file table;
    /// additions overwrite entries and removals delete them.
    pub fn child_of<'a>(
        parent_oid: ObjectId,
        parent: &Commit,
        message: String,
        branch: BranchName,
        additions: impl IntoIterator<Item = (&'a PathBuf, &'a ObjectId)>,
        removals: impl IntoIterator<Item = &'a PathBuf>,
    ) -> anyhow::Result<Self> {
        let mut files = parent.files.clone();
        for (path, oid) in additions {
            files.insert(path.clone(), oid.clone());
        }
        for path in removals {
            files.remove(path);
        }

        Self::new(
            message,
            chrono::Local::now().fixed_offset(),
            Some(parent_oid),
            branch,
            files,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    pub fn blob_id(&self, path: &Path) -> Option<&ObjectId> {
        self.files.get(path)
    }

    pub fn tracks(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn rfc3339_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, false)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut body = Vec::new();

        if let Some(parent) = &self.parent {
            writeln!(body, "parent {}", parent)?;
        }
        writeln!(body, "branch {}", self.branch)?;
        writeln!(body, "timestamp {}", self.rfc3339_timestamp())?;
        for (path, oid) in &self.files {
            let path = path
                .to_str()
                .with_context(|| format!("Path {:?} is not valid UTF-8", path))?;
            if path.contains('\n') {
                anyhow::bail!("File entry {:?} would break the commit record", path);
            }
            writeln!(body, "file {} {}", oid, path)?;
        }
        writeln!(body)?;
        body.write_all(self.message.as_bytes())?;

        Ok(with_header(self.object_type(), &body))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut parent = None;
        let mut branch = None;
        let mut timestamp = None;
        let mut files = FileTable::new();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                anyhow::bail!("Unexpected end of commit record");
            }
            let line = line.trim_end_matches('\n');
            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Malformed commit header line: {line}"))?;
            match key {
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "branch" => branch = Some(BranchName::try_parse(value.to_string())?),
                "timestamp" => {
                    timestamp = Some(
                        DateTime::parse_from_rfc3339(value)
                            .with_context(|| format!("Invalid commit timestamp: {value}"))?,
                    )
                }
                "file" => {
                    let (oid, path) = value
                        .split_once(' ')
                        .with_context(|| format!("Malformed file entry: {value}"))?;
                    files.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
                }
                _ => anyhow::bail!("Unknown commit header: {key}"),
            }
        }

        let mut message = String::new();
        reader.read_to_string(&mut message)?;

        Commit::new(
            message,
            timestamp.context("Commit is missing its timestamp")?,
            parent,
            branch.context("Commit is missing its branch")?,
            files,
        )
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn identity(&self) -> anyhow::Result<Bytes> {
        let mut identity = Vec::new();
        identity.write_all(self.message.as_bytes())?;
        identity.push(b'\0');
        identity.write_all(self.rfc3339_timestamp().as_bytes())?;

        Ok(Bytes::from(identity))
    }
}
