use anyhow::Context;
use std::io::BufRead;

/// Kind of record kept in the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

/// Decoded `<type> <size>\0` prefix of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub object_type: ObjectType,
    /// Length of the body that follows the header
    pub size: usize,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume a record header, leaving `reader` at the start of the body
    pub fn read_header(reader: &mut impl BufRead) -> anyhow::Result<RecordHeader> {
        let kind = Self::read_field(reader, b' ').context("Record has no type")?;
        let size = Self::read_field(reader, b'\0').context("Record has no size")?;

        Ok(RecordHeader {
            object_type: ObjectType::try_from(kind.as_str())?,
            size: size
                .parse()
                .with_context(|| format!("Invalid record size: {size}"))?,
        })
    }

    fn read_field(reader: &mut impl BufRead, terminator: u8) -> anyhow::Result<String> {
        let mut field = Vec::new();
        reader.read_until(terminator, &mut field)?;
        if field.pop() != Some(terminator) {
            anyhow::bail!("Truncated record header");
        }

        Ok(String::from_utf8(field)?)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Unknown object type: {}", value)),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
