use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// Repository whose master head tracks `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(dir.join("a").join("2.txt"), "two".to_string()));
    write_file(FileSpec::new(
        dir.join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    for file in ["1.txt", "a/2.txt", "a/b/3.txt"] {
        run_twig_command(dir, &["add", file]).assert().success();
    }

    twig_commit(dir, "first commit").assert().success();

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Standard output of a command that is expected to succeed
pub fn twig_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("twig output is not UTF-8")
}

/// Get the commit id the active branch points at
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".twig").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    let ref_path = head_content
        .trim()
        .strip_prefix("ref: ")
        .ok_or("HEAD is not a symbolic reference")?;
    let ref_file = dir.join(".twig").join(ref_path);
    let commit_sha = std::fs::read_to_string(ref_file)?;

    Ok(commit_sha.trim().to_string())
}

/// Get the name of the active branch
pub fn get_current_branch(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".twig").join("HEAD"))?;

    let branch = head_content
        .trim()
        .strip_prefix("ref: refs/heads/")
        .ok_or("HEAD does not name a branch")?;

    Ok(branch.to_string())
}
