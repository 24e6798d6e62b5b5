//! Commit history traversal
//!
//! - `rev_list`: lazy walk from a commit to the root along first-parent links

pub mod rev_list;
