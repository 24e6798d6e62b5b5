//! Object types and operations
//!
//! Everything the object store holds is an object identified by a SHA-1 hash:
//!
//! - **Blob**: one version of one file (path and raw bytes)
//! - **Commit**: a snapshot with message, timestamp, parent and file table
//!
//! Records are stored as `<type> <size>\0<body>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
