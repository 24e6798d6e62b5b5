use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    committed_repository_dir, init_repository_dir, repository_dir, run_twig_command, twig_stdout,
};
use common::file::{FileSpec, write_file};
use common::status_section;

#[rstest]
fn rm_of_a_staged_file_only_unstages_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("draft.txt"), "draft".to_string()));
    run_twig_command(dir, &["add", "draft.txt"]).assert().success();

    run_twig_command(dir, &["rm", "draft.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dir.join("draft.txt").is_file());
    let status = twig_stdout(dir, &["status"]);
    assert!(status_section(&status, "Staged Files").is_empty());
    assert!(status_section(&status, "Removed Files").is_empty());
    assert_eq!(status_section(&status, "Untracked Files"), vec!["draft.txt"]);
}

#[rstest]
fn rm_of_a_tracked_file_stages_removal_and_deletes_it(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();

    run_twig_command(dir, &["rm", "a/b/3.txt"]).assert().success();

    assert!(!dir.join("a").join("b").join("3.txt").exists());
    let status = twig_stdout(dir, &["status"]);
    assert_eq!(status_section(&status, "Removed Files"), vec!["a/b/3.txt"]);
    assert!(status_section(&status, "Modifications Not Staged For Commit").is_empty());
}

#[rstest]
fn rm_of_a_modified_tracked_file_drops_the_staged_version(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "edited".to_string()));
    run_twig_command(dir, &["add", "1.txt"]).assert().success();
    run_twig_command(dir, &["rm", "1.txt"]).assert().success();

    assert!(!dir.join("1.txt").exists());
    let status = twig_stdout(dir, &["status"]);
    assert!(status_section(&status, "Staged Files").is_empty());
    assert_eq!(status_section(&status, "Removed Files"), vec!["1.txt"]);
}

#[rstest]
fn rm_of_an_already_deleted_tracked_file_stages_removal(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();

    std::fs::remove_file(dir.join("1.txt"))?;
    run_twig_command(dir, &["rm", "1.txt"]).assert().success();

    let status = twig_stdout(dir, &["status"]);
    assert_eq!(status_section(&status, "Removed Files"), vec!["1.txt"]);
    assert!(status_section(&status, "Modifications Not Staged For Commit").is_empty());

    Ok(())
}

#[rstest]
fn rm_of_an_unknown_file_is_rejected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("stray.txt"), "stray".to_string()));

    run_twig_command(dir, &["rm", "stray.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("No reason to remove the file.\n"));

    assert!(dir.join("stray.txt").is_file());
}

#[rstest]
fn rm_outside_a_repository_is_rejected(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["rm", "file.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("Not in an initialized twig directory.\n"));
}

#[rstest]
fn rm_of_a_repository_file_is_rejected(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();

    run_twig_command(dir, &["rm", ".twig/HEAD"])
        .assert()
        .success()
        .stdout(predicate::eq("File is outside the working tree.\n"));

    assert!(dir.join(".twig").join("HEAD").is_file());
    let status = twig_stdout(dir, &["status"]);
    assert!(status_section(&status, "Removed Files").is_empty());
}
