//! Staging record file format
//!
//! The staging area is persisted as a single binary record.
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "TWIX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Addition count (4 bytes)
//!   - Removal count (4 bytes)
//!
//! Additions:
//!   - Blob ID (20 bytes, binary)
//!   - Path length (2 bytes) followed by the path
//!
//! Removals:
//!   - Path length (2 bytes) followed by the path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the staging record header in bytes
pub const HEADER_SIZE: usize = 16;

/// Size of a binary blob ID in an addition entry
pub const OID_SIZE: usize = 20;

/// Size of the length prefix in front of every path
pub const PATH_LENGTH_SIZE: usize = 2;

/// Magic signature identifying staging records
pub const SIGNATURE: &str = "TWIX";

/// Staging record format version
pub const VERSION: u32 = 1;
