use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    get_current_branch, get_head_commit_sha, init_repository_dir, repository_dir,
    run_twig_command, twig_stdout,
};

#[rstest]
fn init_creates_the_repository_layout(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let twig_path = repository_dir.path().canonicalize()?.join(".twig");

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Initialized empty twig repository in",
        ))
        .stdout(predicate::str::contains(twig_path.display().to_string()));

    assert!(twig_path.join("objects").is_dir());
    assert!(twig_path.join("refs").join("heads").join("master").is_file());
    assert!(twig_path.join("graph").is_file());
    assert!(twig_path.join("index").is_file());
    assert_eq!(get_current_branch(repository_dir.path())?, "master");

    Ok(())
}

#[rstest]
fn root_commit_is_registered_in_the_graph(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head = get_head_commit_sha(init_repository_dir.path())?;
    let graph = std::fs::read_to_string(init_repository_dir.path().join(".twig").join("graph"))?;

    assert_eq!(head.len(), 40);
    assert_eq!(graph.lines().collect::<Vec<_>>(), vec![head.as_str()]);

    Ok(())
}

#[rstest]
fn root_commit_has_the_same_id_in_every_repository(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let other = TempDir::new()?;
    run_twig_command(other.path(), &["init"]).assert().success();

    assert_eq!(
        get_head_commit_sha(init_repository_dir.path())?,
        get_head_commit_sha(other.path())?
    );

    Ok(())
}

#[rstest]
fn init_twice_reports_an_existing_repository(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "A twig version-control system already exists in the current directory.\n",
        ));
}

#[rstest]
#[case::add(&["add", "file.txt"])]
#[case::commit(&["commit", "message"])]
#[case::log(&["log"])]
#[case::status(&["status"])]
#[case::branch(&["branch", "feature"])]
#[case::reset(&["reset", "abc"])]
fn commands_outside_a_repository_are_rejected(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), args)
        .assert()
        .success()
        .stdout(predicate::eq("Not in an initialized twig directory.\n"));

    assert!(!repository_dir.path().join(".twig").exists());
}

#[rstest]
fn fresh_repository_has_a_clean_status(init_repository_dir: TempDir) {
    let output = twig_stdout(init_repository_dir.path(), &["status"]);

    assert_eq!(
        output,
        "=== Branches ===\n\
         *master\n\
         \n\
         === Staged Files ===\n\
         \n\
         === Removed Files ===\n\
         \n\
         === Modifications Not Staged For Commit ===\n\
         \n\
         === Untracked Files ===\n\
         \n"
    );
}

#[rstest]
fn fresh_repository_log_shows_the_initial_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head = get_head_commit_sha(init_repository_dir.path())?;
    let output = twig_stdout(init_repository_dir.path(), &["log"]);

    assert_eq!(
        output,
        format!(
            "===\ncommit {head}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"
        )
    );

    Ok(())
}

#[rstest]
fn directory_option_runs_in_another_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let outside = TempDir::new()?;
    let target = repository_dir.path().display().to_string();

    run_twig_command(outside.path(), &["-C", &target, "init"])
        .assert()
        .success();

    assert!(repository_dir.path().join(".twig").is_dir());
    assert!(!outside.path().join(".twig").exists());

    Ok(())
}
