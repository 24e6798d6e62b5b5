//! A minimal local version-control engine
//!
//! Snapshots of a working directory are stored as content-addressed blobs and
//! commits under `.twig/`, organized into a linear history per branch.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
