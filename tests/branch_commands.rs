use crate::common::command::{
    commit_file, find_commit, init_repository_dir, log_of, run_bitlet_command,
};
use crate::common::file::read_file;
use crate::common::{commit_ids, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn new_branches_start_at_the_current_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();

    assert_eq!(commit_ids(&log_of(dir))[0], find_commit(dir, "first commit"));
}

#[rstest]
fn branches_move_independently(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, "1.txt", "feature one\n", "feature work");

    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    assert_eq!(read_file(&dir.join("1.txt")), "one\n");
    assert_eq!(commit_ids(&log_of(dir))[0], find_commit(dir, "first commit"));
}

#[rstest]
fn creating_an_existing_branch_fails(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["branch", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch named master already exists.",
        ));
}

#[rstest]
#[case("bad name")]
#[case("..")]
fn invalid_branch_names_are_rejected(init_repository_dir: TempDir, #[case] name: &str) {
    run_bitlet_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid branch name"));
}

#[rstest]
fn removed_branches_leave_their_commits_behind(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "doomed"]).assert().success();
    run_bitlet_command(dir, &["checkout", "doomed"]).assert().success();
    commit_file(dir, "doomed.txt", "doomed\n", "doomed work");
    let doomed = find_commit(dir, "doomed work");
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    run_bitlet_command(dir, &["rm-branch", "doomed"])
        .assert()
        .success();

    run_bitlet_command(dir, &["checkout", "doomed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A branch named doomed does not exist."));

    let output = run_bitlet_command(dir, &["global-log"]).output().unwrap();
    assert!(commit_ids(&stdout_of(&output)).contains(&doomed));

    run_bitlet_command(dir, &["checkout", &doomed, "--", "doomed.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("doomed.txt")), "doomed\n");
}

#[rstest]
fn removing_the_current_branch_fails(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["rm-branch", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot remove the current branch."));
}

#[rstest]
fn removing_a_missing_branch_fails(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["rm-branch", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A branch named ghost does not exist."));
}

#[rstest]
fn status_lists_branches_with_the_current_one_marked(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "zeta"]).assert().success();
    run_bitlet_command(dir, &["branch", "alpha"]).assert().success();

    run_bitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "=== Branches ===\nalpha\n*master\nzeta\n\n",
        ));
}

#[rstest]
fn branches_named_tmp_show_up_in_status(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "tmp-work"]).assert().success();
    run_bitlet_command(dir, &["checkout", "tmp-work"]).assert().success();

    run_bitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "=== Branches ===\nmaster\n*tmp-work\n\n",
        ));
}
