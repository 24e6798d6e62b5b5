use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::anyhow;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Staging-record stream that feeds every byte it moves into a running SHA-1
///
/// Reading ends with [`Checksum::verify`], writing with [`Checksum::seal`];
/// both deal with the 20-byte trailer that closes a record.
#[derive(Debug)]
pub struct Checksum<S> {
    stream: S,
    digest: Sha1,
}

impl<S> Checksum<S> {
    pub(crate) fn new(stream: S) -> Self {
        Checksum {
            stream,
            digest: Sha1::new(),
        }
    }

    fn trailer(&self) -> [u8; CHECKSUM_SIZE] {
        self.digest.clone().finalize().into()
    }
}

impl<S: Read> Checksum<S> {
    /// Read exactly `size` bytes of record body
    pub(crate) fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.stream
            .read_exact(&mut buffer)
            .map_err(|_| anyhow!("Staging record ended early"))?;
        self.digest.update(&buffer);

        Ok(Bytes::from(buffer))
    }

    /// Compare the trailer on disk with the digest of everything read so far
    pub(crate) fn verify(&mut self) -> anyhow::Result<()> {
        let mut stored = [0u8; CHECKSUM_SIZE];
        self.stream
            .read_exact(&mut stored)
            .map_err(|_| anyhow!("Staging record is missing its checksum"))?;

        if stored != self.trailer() {
            anyhow::bail!("Staging record is corrupt: checksum mismatch");
        }

        Ok(())
    }
}

impl<S: Write> Checksum<S> {
    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(data)?;
        self.digest.update(data);

        Ok(())
    }

    /// Append the trailer covering everything written so far
    pub(crate) fn seal(&mut self) -> anyhow::Result<()> {
        let trailer = self.trailer();
        self.stream
            .write_all(&trailer)
            .map_err(|e| anyhow!("Failed to write staging record checksum: {e}"))?;
        self.stream.flush()?;

        Ok(())
    }
}
