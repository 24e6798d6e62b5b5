//! Checkout migration
//!
//! Branch checkout and reset both move the working directory to another
//! commit's file table. The migration plans every change and checks for
//! untracked files in the way before the first file is touched.

pub mod migration;
