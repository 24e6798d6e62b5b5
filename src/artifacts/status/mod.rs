//! Working tree status inspection
//!
//! Compares the working directory against the staging area and the active
//! head commit.
//!
//! ## Components
//!
//! - `file_change`: Enum types for categorizing changes
//! - `status_info`: Status report computation

pub mod file_change;
pub mod status_info;
