use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// The bytes the object's ID is derived from.
    ///
    /// Narrower than the serialized record: a blob is identified by its path
    /// and content, a commit by its message and timestamp.
    fn identity(&self) -> Result<Bytes>;

    fn object_id(&self) -> Result<ObjectId> {
        let identity = self.identity()?;
        let mut hasher = Sha1::new();
        hasher.update(&identity);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}

/// Prefix a record body with its `<type> <size>\0` header
pub(crate) fn with_header(object_type: ObjectType, body: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), body.len());
    let mut record = Vec::with_capacity(header.len() + body.len());
    record.extend_from_slice(header.as_bytes());
    record.extend_from_slice(body);

    Bytes::from(record)
}
