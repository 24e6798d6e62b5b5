//! Object database
//!
//! Content-addressed store for blobs and commits. Every record lives at
//! `objects/<first 2 hex>/<remaining 38 hex>` and, once written, is never
//! overwritten or deleted.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Store a file version and return its blob ID
    ///
    /// Storing the same path and content twice is a no-op.
    pub fn put_blob(&self, path: &Path, content: Bytes) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(path.to_path_buf(), content))
    }

    /// Content of the blob with the given ID
    pub fn get_blob(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Blob, reader)) => Ok(Blob::deserialize(reader)?.into_content()),
            _ => anyhow::bail!(RepositoryError::NoSuchObject(object_id.to_string())),
        }
    }

    pub fn put_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        self.store(commit)
    }

    /// The commit with the given ID
    pub fn get_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Commit, reader)) => Commit::deserialize(reader)
                .with_context(|| format!("Unable to parse commit {}", object_id)),
            _ => anyhow::bail!(RepositoryError::NoSuchCommit(object_id.to_string())),
        }
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        // otherwise, create the object directory
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectType, impl BufRead)>> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.exists() {
            return Ok(None);
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);
        let header = ObjectType::read_header(&mut object_reader)?;

        let body_size = object_reader.get_ref().len() - object_reader.position() as usize;
        if body_size != header.size {
            anyhow::bail!(
                "Object {} is corrupt: header declares {} bytes, found {}",
                object_id,
                header.size,
                body_size
            );
        }

        Ok(Some((header.object_type, object_reader)))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
