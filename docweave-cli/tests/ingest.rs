use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const PAGE: &str = r#"<html><head><title>Notes</title><script>track()</script></head>
<body><h1>Field Notes</h1><p>Plain <strong>bold</strong> text.</p></body></html>"#;

#[test]
fn ingest_local_html_to_stdout() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("notes.html");
    fs::write(&page, PAGE).unwrap();

    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("ingest")
        .arg(&page);

    cmd.assert().success().stdout(
        predicate::str::contains("# Field Notes")
            .and(predicate::str::contains("Plain **bold** text."))
            .and(predicate::str::contains("track()").not()),
    );
}

#[test]
fn ingest_writes_output_file() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("notes.htm");
    let out = dir.path().join("notes.md");
    fs::write(&page, PAGE).unwrap();

    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("ingest")
        .arg(&page)
        .arg("-o")
        .arg(&out);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Saved:"));
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# Field Notes"));
}

#[test]
fn ingest_rejects_unknown_sources() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("ingest")
        .arg("notes.txt");

    cmd.assert().failure().code(1).stderr(
        predicate::str::contains("Error: Unknown source type: notes.txt")
            .and(predicate::str::contains("Supported: URLs")),
    );
}

#[test]
fn ingest_reports_missing_files() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("docweave");
    cmd.current_dir(dir.path())
        .env("DOCWEAVE_HOME", dir.path())
        .arg("ingest")
        .arg("missing.pdf");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found: missing.pdf"));
}
