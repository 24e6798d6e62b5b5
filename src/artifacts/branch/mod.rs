//! Branch names, branch pointers and commit-id resolution

pub mod branch;
pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Directory (relative to the repository directory) holding branch pointers
pub const REF_PREFIX: &str = "refs/heads/";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";
