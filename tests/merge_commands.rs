use crate::common::command::{
    commit_file, find_commit, init_repository_dir, log_of, run_bitlet_command,
};
use crate::common::commit_ids;
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

/// History:
///
/// ```text
///   first ── master work      (master)
///        \
///         feature work        (feature)
/// ```
fn diverge(dir: &Path, master: (&str, &str), feature: (&str, &str)) {
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    commit_file(dir, master.0, master.1, "master work");
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, feature.0, feature.1, "feature work");
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, "3.txt", "three\n", "feature work");
    let feature_head = find_commit(dir, "feature work");
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Current branch fast-forwarded.\n"));

    assert_eq!(read_file(&dir.join("3.txt")), "three\n");
    assert_eq!(commit_ids(&log_of(dir))[0], feature_head);
}

#[rstest]
fn merging_an_ancestor_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "old"]).assert().success();
    commit_file(dir, "3.txt", "three\n", "newer work");
    let head = find_commit(dir, "newer work");

    run_bitlet_command(dir, &["merge", "old"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "Given branch is an ancestor of the current branch.\n",
        ));

    assert_eq!(commit_ids(&log_of(dir))[0], head);
}

#[rstest]
fn diverged_branches_get_a_merge_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge(dir, ("1.txt", "one from master\n"), ("2.txt", "two from feature\n"));
    let master_head = find_commit(dir, "master work");
    let feature_head = find_commit(dir, "feature work");

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(&dir.join("1.txt")), "one from master\n");
    assert_eq!(read_file(&dir.join("2.txt")), "two from feature\n");

    let log = log_of(dir);
    assert!(log.contains(&format!(
        "Merge: {} {}\n",
        &master_head[..7],
        &feature_head[..7]
    )));
    assert!(log.contains("Merged feature into master.\n"));
    assert_eq!(commit_ids(&log)[1], master_head);

    run_bitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Staged Files ===\n\n=== Removed Files ===\n\n",
        ));
}

#[rstest]
fn files_deleted_by_the_given_branch_are_removed(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    commit_file(dir, "3.txt", "three\n", "master work");
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    run_bitlet_command(dir, &["rm", "2.txt"]).assert().success();
    run_bitlet_command(dir, &["commit", "-m", "drop two"])
        .assert()
        .success();
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success();

    assert!(!dir.join("2.txt").exists());
    assert_eq!(read_file(&dir.join("3.txt")), "three\n");
}

#[rstest]
#[case("log")]
#[case("bca")]
fn conflicting_edits_are_marked_in_the_file(init_repository_dir: TempDir, #[case] strategy: &str) {
    let dir = init_repository_dir.path();
    diverge(dir, ("1.txt", "master one\n"), ("1.txt", "feature one\n"));

    run_bitlet_command(dir, &["merge", "feature"])
        .env("BITLET_MERGE_BASE", strategy)
        .assert()
        .success()
        .stdout(predicate::str::diff("Encountered a merge conflict.\n"));

    assert_eq!(
        read_file(&dir.join("1.txt")),
        "<<<<<<< HEAD\nmaster one\n=======\nfeature one\n>>>>>>>\n"
    );
    assert!(log_of(dir).contains("Merge: "));
}

#[rstest]
fn conflicts_with_a_deletion_keep_an_empty_side(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    commit_file(dir, "2.txt", "two, edited\n", "master work");
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    run_bitlet_command(dir, &["rm", "2.txt"]).assert().success();
    run_bitlet_command(dir, &["commit", "-m", "drop two"])
        .assert()
        .success();
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Encountered a merge conflict."));

    assert_eq!(
        read_file(&dir.join("2.txt")),
        "<<<<<<< HEAD\ntwo, edited\n=======\n>>>>>>>\n"
    );
}

#[rstest]
fn merging_with_uncommitted_changes_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge(dir, ("1.txt", "m\n"), ("2.txt", "f\n"));
    write_file(FileSpec::new(dir.join("staged.txt"), "pending\n".to_string()));
    run_bitlet_command(dir, &["add", "staged.txt"]).assert().success();

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You have uncommitted changes."));
}

#[rstest]
fn merging_a_branch_with_itself_fails(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["merge", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot merge a branch with itself."));
}

#[rstest]
fn merging_a_missing_branch_fails(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["merge", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A branch named ghost does not exist."));
}

#[rstest]
fn untracked_files_block_a_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge(dir, ("1.txt", "m\n"), ("new.txt", "from feature\n"));
    write_file(FileSpec::new(dir.join("new.txt"), "mine\n".to_string()));

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There is an untracked file in the way; delete it, or add and commit it first.",
        ));

    assert_eq!(read_file(&dir.join("new.txt")), "mine\n");
    assert!(!log_of(dir).contains("Merge:"));
}
