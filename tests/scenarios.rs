use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sha1::{Digest, Sha1};
use std::path::Path;

mod common;

use common::command::{
    get_current_branch, get_head_commit_sha, init_repository_dir, repository_dir,
    run_twig_command, twig_commit, twig_stdout,
};
use common::file::{FileSpec, read_file, write_file};
use common::status_section;

fn blob_id(path: &str, content: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(path.as_bytes());
    hasher.update(b"\0");
    hasher.update(content.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Tracked-file lines (`file <blob> <path>`) of a stored commit record
fn tracked_files(dir: &Path, commit_id: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let (fan_out, rest) = commit_id.split_at(2);
    let record = std::fs::read(dir.join(".twig").join("objects").join(fan_out).join(rest))?;
    let record = String::from_utf8(record)?;

    Ok(record
        .lines()
        .filter_map(|line| line.strip_prefix("file "))
        .map(str::to_string)
        .collect())
}

#[rstest]
fn init_starts_on_master_with_an_empty_root_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let root = get_head_commit_sha(dir)?;

    let status = twig_stdout(dir, &["status"]);
    assert_eq!(status_section(&status, "Branches"), vec!["*master"]);
    assert_eq!(get_current_branch(dir)?, "master");
    assert!(twig_stdout(dir, &["log"]).contains("\ninitial commit\n"));
    assert!(tracked_files(dir, &root)?.is_empty());

    Ok(())
}

#[rstest]
fn add_commit_modify_restore_remove(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let root = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(dir.join("a.txt"), "hello".to_string()));
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    twig_commit(dir, "add a").assert().success();

    let added = get_head_commit_sha(dir)?;
    assert_ne!(added, root);
    assert_eq!(
        tracked_files(dir, &added)?,
        vec![format!("{} a.txt", blob_id("a.txt", "hello"))]
    );
    let status = twig_stdout(dir, &["status"]);
    assert!(status_section(&status, "Staged Files").is_empty());

    write_file(FileSpec::new(dir.join("a.txt"), "bye".to_string()));
    let status = twig_stdout(dir, &["status"]);
    assert_eq!(
        status_section(&status, "Modifications Not Staged For Commit"),
        vec!["a.txt (modified)"]
    );
    run_twig_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("a.txt")), "hello");

    run_twig_command(dir, &["rm", "a.txt"]).assert().success();
    assert!(!dir.join("a.txt").exists());
    let status = twig_stdout(dir, &["status"]);
    assert_eq!(status_section(&status, "Removed Files"), vec!["a.txt"]);

    twig_commit(dir, "remove a").assert().success();
    let removed = get_head_commit_sha(dir)?;
    assert!(tracked_files(dir, &removed)?.is_empty());
    assert_eq!(tracked_files(dir, &added)?.len(), 1);

    Ok(())
}

#[rstest]
fn active_branch_cannot_be_removed_while_another_exists(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["branch", "feat"]).assert().success();
    run_twig_command(dir, &["rm-branch", "master"])
        .assert()
        .success()
        .stdout(predicate::eq("Cannot remove the current branch.\n"));

    let status = twig_stdout(dir, &["status"]);
    assert_eq!(status_section(&status, "Branches"), vec!["feat", "*master"]);

    Ok(())
}

#[rstest]
fn identical_content_under_two_names_gets_two_blobs(init_repository_dir: TempDir) {
    assert_ne!(blob_id("x.txt", "same"), blob_id("y.txt", "same"));

    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("x.txt"), "same".to_string()));
    write_file(FileSpec::new(dir.join("y.txt"), "same".to_string()));
    run_twig_command(dir, &["add", "x.txt"]).assert().success();
    run_twig_command(dir, &["add", "y.txt"]).assert().success();

    for name in ["x.txt", "y.txt"] {
        let oid = blob_id(name, "same");
        let (fan_out, rest) = oid.split_at(2);
        assert!(
            dir.join(".twig/objects").join(fan_out).join(rest).is_file(),
            "{name}"
        );
    }
}

#[rstest]
fn unrecoverable_failures_exit_with_an_error(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    std::fs::write(dir.join(".twig").join("HEAD"), "garbage\n")?;

    run_twig_command(dir, &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));

    Ok(())
}

#[rstest]
fn unknown_subcommands_are_rejected_by_the_parser(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["frobnicate"])
        .assert()
        .failure();
}
