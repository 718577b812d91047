//! CLI integration tests.
//!
//! These tests exercise the CLI commands end-to-end.

use std::path::Path;
use std::process::{Command, Output};
use svcs_test_utils::TestProject;

fn svcs(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svcs"))
        .args(args)
        .current_dir(dir)
        .env_remove("SVCS_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_no_command_lists_commands() {
    let project = TestProject::new().build();
    let output = svcs(project.path(), &[]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("These are SVCS commands:"));
    for line in ["config", "add", "log", "commit", "checkout"] {
        assert!(out.contains(line), "missing {line} in {out}");
    }
    assert!(out.contains("Restore a file."));
}

#[test]
fn test_help_command() {
    let project = TestProject::new().build();
    let output = svcs(project.path(), &["--help"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Simple snapshot version control"));
}

#[test]
fn test_unknown_command_is_reported() {
    let project = TestProject::new().build();
    let output = svcs(project.path(), &["status"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "'status' is not a SVCS command.");
    assert!(!project.file_exists("vcs"));
}

#[test]
fn test_config_set_and_show() {
    let project = TestProject::new().build();

    let output = svcs(project.path(), &["config"]);
    assert_eq!(stdout(&output), "Please, tell me who you are.");

    let output = svcs(project.path(), &["config", "alice"]);
    assert_eq!(stdout(&output), "The username is alice.");

    let output = svcs(project.path(), &["config"]);
    assert_eq!(stdout(&output), "The username is alice.");
}

#[test]
fn test_add_and_list_tracked_files() {
    let project = TestProject::new()
        .with_file("a.txt", "hello")
        .with_file("b.txt", "world")
        .build();

    let output = svcs(project.path(), &["add"]);
    assert_eq!(stdout(&output), "Add a file to the index.");

    let output = svcs(project.path(), &["add", "a.txt"]);
    assert_eq!(stdout(&output), "The file 'a.txt' is tracked.");
    svcs(project.path(), &["add", "b.txt"]);

    let output = svcs(project.path(), &["add"]);
    assert_eq!(stdout(&output), "Tracked files:\na.txt\nb.txt");
}

#[test]
fn test_add_missing_file() {
    let project = TestProject::new().build();

    let output = svcs(project.path(), &["add", "nope.txt"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Can't find 'nope.txt'.");
    assert!(!project.file_exists("vcs/index.txt"));
}

#[test]
fn test_commit_log_checkout_round() {
    let project = TestProject::new()
        .with_file("a.txt", "hello")
        .with_author("alice")
        .build();
    let hash = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    svcs(project.path(), &["add", "a.txt"]);
    let output = svcs(project.path(), &["commit", "first"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Changes are committed."));
    assert!(stdout(&output).contains(hash));

    let output = svcs(project.path(), &["log"]);
    assert_eq!(
        stdout(&output),
        format!("commit {hash}\nAuthor: alice\nfirst")
    );

    project.write_file("a.txt", "bye");
    let output = svcs(project.path(), &["checkout", hash]);
    assert_eq!(stdout(&output), format!("Switched to commit {hash}."));
    assert_eq!(project.read_file("a.txt"), "hello");
}

#[test]
fn test_commit_status_messages() {
    let project = TestProject::new()
        .with_file("a.txt", "hello")
        .build();

    let output = svcs(project.path(), &["commit"]);
    assert_eq!(stdout(&output), "Message was not passed.");

    let output = svcs(project.path(), &["commit", "first"]);
    assert_eq!(stdout(&output), "Nothing to commit.");

    svcs(project.path(), &["add", "a.txt"]);
    let output = svcs(project.path(), &["commit", "first"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Please, tell me who you are.");
}

#[test]
fn test_log_and_checkout_without_commits() {
    let project = TestProject::new().build();

    let output = svcs(project.path(), &["log"]);
    assert_eq!(stdout(&output), "No commits yet.");

    let output = svcs(project.path(), &["checkout"]);
    assert_eq!(stdout(&output), "Commit id was not passed.");

    let unknown = "0".repeat(64);
    let output = svcs(project.path(), &["checkout", &unknown]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Commit does not exist.");
}

#[test]
fn test_repo_flag_uses_other_directory() {
    let project = TestProject::new()
        .with_file("work/a.txt", "hello")
        .build();

    let output = svcs(project.path(), &["--repo", "work", "add", "work/a.txt"]);
    assert_eq!(stdout(&output), "The file 'a.txt' is tracked.");
    assert!(project.file_exists("work/vcs/index.txt"));
}

#[test]
fn test_corrupted_log_is_an_error() {
    let project = TestProject::new()
        .with_file("vcs/log.txt", "garbage\n")
        .build();

    let output = svcs(project.path(), &["log"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Repository corrupted"));
}
