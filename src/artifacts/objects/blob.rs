//! Blob object
//!
//! A blob records one version of one file. Unlike Git, the blob remembers the
//! path it was read from and that path takes part in its hash, so identical
//! contents under two names are stored twice.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<path>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Repository-relative path of the file
    path: PathBuf,
    /// Raw file content
    content: Bytes,
}

impl Blob {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }

    fn path_bytes(&self) -> Vec<u8> {
        self.path.to_string_lossy().as_bytes().to_vec()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), &self.identity()?))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut path = Vec::new();
        reader.read_until(b'\0', &mut path)?;
        if path.pop() != Some(b'\0') {
            anyhow::bail!("Blob record is missing its path terminator");
        }
        let path = String::from_utf8(path).context("Blob path is not valid UTF-8")?;

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(PathBuf::from(path), Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn identity(&self) -> anyhow::Result<Bytes> {
        let mut identity = self.path_bytes();
        identity.push(b'\0');
        identity.extend_from_slice(&self.content);

        Ok(Bytes::from(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn hash_depends_on_the_path() {
        let a = Blob::new(PathBuf::from("a.txt"), Bytes::from_static(b"hello"));
        let b = Blob::new(PathBuf::from("b.txt"), Bytes::from_static(b"hello"));

        assert_ne!(a.object_id().unwrap(), b.object_id().unwrap());
    }

    #[test]
    fn hash_is_deterministic() {
        let a = Blob::new(PathBuf::from("a.txt"), Bytes::from_static(b"hello"));
        let again = Blob::new(PathBuf::from("a.txt"), Bytes::from_static(b"hello"));

        assert_eq!(a.object_id().unwrap(), again.object_id().unwrap());
    }

    #[test]
    fn record_parses_back_including_nul_bytes_in_content() {
        let blob = Blob::new(
            PathBuf::from("dir/data.bin"),
            Bytes::from_static(b"\0binary\0data"),
        );
        let mut reader = Cursor::new(blob.serialize().unwrap());

        assert_eq!(
            ObjectType::read_header(&mut reader).unwrap().object_type,
            ObjectType::Blob
        );
        assert_eq!(Blob::deserialize(reader).unwrap(), blob);
    }
}
