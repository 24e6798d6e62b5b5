use colored::Colorize;

/// How a file in the working tree differs from what the next commit would
/// record for it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "modified",
            WorkspaceChangeType::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let change_str: &str = self.into();
        write!(f, "{}", change_str)
    }
}

/// Which status section a file is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Staged,
    Removed,
    Unstaged,
    Untracked,
}

impl FileChangeType {
    pub fn colorize(&self, text: &str) -> colored::ColoredString {
        match self {
            FileChangeType::Staged => text.green(),
            FileChangeType::Removed => text.red(),
            FileChangeType::Unstaged => text.red(),
            FileChangeType::Untracked => text.normal(),
        }
    }
}

impl From<&FileChangeType> for &str {
    fn from(change: &FileChangeType) -> Self {
        match change {
            FileChangeType::Staged => "Staged Files",
            FileChangeType::Removed => "Removed Files",
            FileChangeType::Unstaged => "Modifications Not Staged For Commit",
            FileChangeType::Untracked => "Untracked Files",
        }
    }
}
