//! Data structures and algorithms
//!
//! - `branch`: Branch names and commit-id resolution
//! - `checkout`: Working-directory migration and untracked-file protection
//! - `core`: Shared utilities (pager wrapper)
//! - `index`: Staging record file format
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
