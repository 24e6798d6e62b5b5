//! Porcelain commands
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository).
//! Each one validates its arguments and the repository state before it
//! writes anything.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file
//! - `commit`: Create a new commit from the staging area
//! - `rm`: Unstage a file or stage its removal
//! - `log`: Show the active branch's history, or every commit
//! - `find`: List commits with a given message
//! - `status`: Show branches, staged changes and working tree status
//! - `branch`: Create or delete branches
//! - `checkout`: Restore files or switch branches
//! - `reset`: Move the active branch to another commit

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod reset;
pub mod rm;
pub mod status;
