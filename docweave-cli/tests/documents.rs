use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn push_without_input_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("push");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Provide a file path or --stdin"));
}

#[test]
fn push_missing_file_fails_before_sign_in() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .args(["push", "nowhere.md"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found: nowhere.md"));
    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn pull_update_without_history_points_to_output() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .args([
            "pull",
            "https://docs.google.com/document/d/1AbC-xyz/edit",
            "--update",
        ]);

    cmd.assert().failure().stderr(
        predicate::str::contains("No source file found for document 1AbC-xyz")
            .and(predicate::str::contains("--output")),
    );
}

#[test]
fn pull_update_with_vanished_directory_shows_recorded_path() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("history.json"),
        r#"[{"id": "doc-1", "title": "Plan", "source": "/no/such/dir/plan.md",
            "url": "https://docs.google.com/document/d/doc-1/edit",
            "created_at": "2026-01-05T10:00:00Z"}]"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .args(["pull", "doc-1", "-u"]);

    cmd.assert().failure().stderr(
        predicate::str::contains("Source directory not found: /no/such/dir")
            .and(predicate::str::contains("Original path from history: /no/such/dir/plan.md")),
    );
}

#[test]
fn list_with_empty_history() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("list");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No documents created yet."));
}

#[test]
fn list_shows_newest_first() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("history.json"),
        r#"[
  {"id": "a", "title": "First Draft", "source": "/notes/first.md",
   "url": "https://docs.google.com/document/d/a/edit", "created_at": "2026-01-05T10:00:00Z"},
  {"id": "b", "title": "Second Draft", "source": "stdin",
   "url": "https://docs.google.com/document/d/b/edit", "created_at": "2026-01-06T10:00:00Z"}
]"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("list");

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.starts_with("Recent documents (2):"));
    let second = stdout.find("Second Draft").unwrap();
    let first = stdout.find("First Draft").unwrap();
    assert!(second < first);
    assert!(stdout.contains("  Source: stdin"));
}
