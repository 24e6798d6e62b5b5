//! Commit graph index
//!
//! The list of every commit ever created, one 40-character hash per line in
//! sorted order. It backs `global-log` and abbreviated-id resolution, so
//! neither has to walk the object store.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

#[derive(Debug)]
pub struct Graph {
    /// Path to the index file (typically `.twig/graph`)
    path: Box<Path>,
}

impl Graph {
    pub fn new(path: Box<Path>) -> Self {
        Graph { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every known commit, sorted by hash
    pub fn all(&self) -> anyhow::Result<BTreeSet<ObjectId>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read commit graph {}", self.path.display()))?;

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ObjectId::try_parse(line.to_string()))
            .collect()
    }

    pub fn contains(&self, oid: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.all()?.contains(oid))
    }

    /// Record a new commit
    pub fn register(&self, oid: ObjectId) -> anyhow::Result<()> {
        let mut commits = self.all()?;
        if !commits.insert(oid.clone()) {
            return Ok(());
        }

        self.write(&commits)?;
        tracing::debug!(%oid, total = commits.len(), "registered commit");

        Ok(())
    }

    /// Known commits whose hash starts with `prefix`
    pub fn matching(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|oid| oid.matches_prefix(prefix))
            .collect())
    }

    fn write(&self, commits: &BTreeSet<ObjectId>) -> anyhow::Result<()> {
        let temp_path = self
            .path
            .with_extension(format!("tmp-{}", fake::rand::random::<u32>()));

        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
                .with_context(|| format!("Unable to open commit graph {}", temp_path.display()))?;

            for oid in commits {
                writeln!(file, "{}", oid)?;
            }
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to replace commit graph {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> (TempDir, Graph) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let graph = Graph::new(dir.path().join("graph").into_boxed_path());
        (dir, graph)
    }

    fn oid(hex: &str) -> ObjectId {
        ObjectId::try_parse(format!("{hex:0<40}")).unwrap()
    }

    #[rstest]
    fn commits_are_kept_sorted_without_duplicates(graph: (TempDir, Graph)) {
        let (_dir, graph) = graph;
        graph.register(oid("c1")).unwrap();
        graph.register(oid("a1")).unwrap();
        graph.register(oid("c1")).unwrap();

        assert_eq!(
            graph.all().unwrap().into_iter().collect::<Vec<_>>(),
            vec![oid("a1"), oid("c1")]
        );
        assert_eq!(
            std::fs::read_to_string(graph.path()).unwrap(),
            format!("{}\n{}\n", oid("a1"), oid("c1"))
        );
    }

    #[rstest]
    fn prefixes_match_every_candidate(graph: (TempDir, Graph)) {
        let (_dir, graph) = graph;
        graph.register(oid("abc1")).unwrap();
        graph.register(oid("abc2")).unwrap();
        graph.register(oid("def")).unwrap();

        assert_eq!(graph.matching("ABC").unwrap(), vec![oid("abc1"), oid("abc2")]);
        assert_eq!(graph.matching("abc2").unwrap(), vec![oid("abc2")]);
        assert!(graph.matching("0").unwrap().is_empty());
    }

    #[rstest]
    fn missing_file_is_an_empty_graph(graph: (TempDir, Graph)) {
        let (_dir, graph) = graph;

        assert!(graph.all().unwrap().is_empty());
    }
}
