//! User-facing error kinds
//!
//! Every precondition failure a command can report is one variant of
//! [`RepositoryError`]. Operations return `anyhow::Result` and raise these with
//! `anyhow::bail!`, so callers can tell a handled user error (downcast succeeds)
//! apart from an internal failure such as an I/O error.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not in an initialized twig directory.")]
    UninitializedRepository,
    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Incorrect operands.")]
    BadArguments,
    #[error("File does not exist.")]
    FileNotFound(PathBuf),
    #[error("File is outside the working tree.")]
    OutsideWorkingTree(PathBuf),
    #[error("File names containing line breaks cannot be tracked.")]
    UnsupportedFileName(PathBuf),
    #[error("No reason to remove the file.")]
    NoReasonToRemove(PathBuf),
    #[error("File does not exist in that commit.")]
    NotTrackedInCommit(PathBuf),
    #[error("No commit with that id exists.")]
    NoSuchCommit(String),
    #[error("No object with id {0} exists.")]
    NoSuchObject(String),
    #[error("No such branch exists.")]
    NoSuchBranch(String),
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),
    #[error("Branch name {0} clashes with the path of an existing branch.")]
    BranchPathConflict(String),
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),
    #[error("Cannot remove the current branch.")]
    CannotRemoveActiveBranch(String),
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileWouldBeOverwritten(Vec<PathBuf>),
    #[error("Commit id {prefix} is ambiguous; candidates are: {}", candidates.join(", "))]
    AmbiguousCommitId {
        prefix: String,
        candidates: Vec<String>,
    },
}

impl RepositoryError {
    /// Recover the user-facing kind from an error chain, if there is one.
    pub fn from_anyhow(error: &anyhow::Error) -> Option<&RepositoryError> {
        error.chain().find_map(|cause| cause.downcast_ref())
    }
}
