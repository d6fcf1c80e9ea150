use crate::common::file::{FileSpec, write_file};
use crate::common::{redirect_temp_dir, stdout_of};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const FIXED_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository holding one commit with `1.txt` and `2.txt`.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    run_bitlet_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("1.txt"), "one\n".to_string()));
    write_file(FileSpec::new(dir.join("2.txt"), "two\n".to_string()));
    run_bitlet_command(dir, &["add", "1.txt", "2.txt"])
        .assert()
        .success();
    bitlet_commit(dir, "first commit").assert().success();

    repository_dir
}

pub fn run_bitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitlet").expect("Failed to find bitlet binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("BITLET_DATE", FIXED_DATE)]);
    cmd.env_remove("BITLET_MERGE_BASE");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bitlet_commit(dir: &Path, message: &str) -> Command {
    run_bitlet_command(dir, &["commit", "-m", message])
}

/// Write `content` to `name`, stage it and commit it.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_bitlet_command(dir, &["add", name]).assert().success();
    bitlet_commit(dir, message).assert().success();
}

/// Id of the only commit whose message is `message`.
pub fn find_commit(dir: &Path, message: &str) -> String {
    let output = run_bitlet_command(dir, &["find", message])
        .output()
        .expect("Failed to run find");
    let stdout = stdout_of(&output);
    let mut ids = stdout.lines();

    let id = ids.next().expect("no commit with that message").to_string();
    assert!(ids.next().is_none(), "more than one commit named {message:?}");
    id
}

pub fn log_of(dir: &Path) -> String {
    let output = run_bitlet_command(dir, &["log"])
        .output()
        .expect("Failed to run log");
    stdout_of(&output)
}
