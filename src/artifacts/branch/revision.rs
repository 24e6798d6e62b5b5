use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use derive_new::new;

/// Resolves user-supplied commit ids against the commit graph.
///
/// Any non-empty hexadecimal prefix of a known commit hash names that commit,
/// compared without regard to case. A prefix shared by several commits is an
/// error listing them; it is never narrowed down to one.
///
/// # Examples
///
/// ```ignore
/// let revision = RevisionContext::new(&repository);
///
/// let oid = revision.resolve("3b18e5")?;
/// let (oid, commit) = revision.resolve_commit("3b18e512dba79e4c8300dd08aeb37f8e728b8dad")?;
/// ```
#[derive(new)]
pub struct RevisionContext<'r> {
    repository: &'r Repository,
}

impl RevisionContext<'_> {
    pub fn resolve(&self, commit_id: &str) -> anyhow::Result<ObjectId> {
        let prefix = commit_id.trim();

        if !Self::looks_like_oid(prefix) {
            anyhow::bail!(RepositoryError::NoSuchCommit(commit_id.to_string()));
        }

        let mut matches = self.repository.graph().matching(prefix)?;
        match matches.len() {
            0 => anyhow::bail!(RepositoryError::NoSuchCommit(commit_id.to_string())),
            1 => Ok(matches.remove(0)),
            _ => anyhow::bail!(RepositoryError::AmbiguousCommitId {
                prefix: prefix.to_string(),
                candidates: matches.iter().map(ToString::to_string).collect(),
            }),
        }
    }

    /// Resolve `commit_id` and load the commit it names
    pub fn resolve_commit(&self, commit_id: &str) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = self.resolve(commit_id)?;
        let commit = self.repository.database().get_commit(&oid)?;

        Ok((oid, commit))
    }

    fn looks_like_oid(prefix: &str) -> bool {
        !prefix.is_empty()
            && prefix.len() <= OBJECT_ID_LENGTH
            && prefix.chars().all(|c| c.is_ascii_hexdigit())
    }
}
