//! Core repository components
//!
//! This module contains the persistent building blocks of a repository:
//!
//! - `database`: Object database for storing blobs and commits
//! - `graph`: Index of every commit ever created
//! - `index`: Staging area of pending additions and removals
//! - `refs`: Branch pointers and the active-branch reference
//! - `repository`: Per-invocation context tying the stores together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod graph;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
