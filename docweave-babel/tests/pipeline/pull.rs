use crate::common::{Call, FakeHistory, FakeService, DOC_ID};
use docweave_babel::error::PipelineError;
use docweave_babel::pull::{pull, PullTarget};
use std::fs;

const EXPORT: &str = r#"<html><head><meta content="text/html; charset=UTF-8" http-equiv="content-type"><style type="text/css">.c1{font-weight:700}.c2{font-style:italic}.c3{color:#000000}</style></head>
<body class="c3"><h1 id="h.x1"><span class="c3">Status</span></h1>
<p class="c3"><span>Ship&nbsp;it</span><span class="c3"></span><span class="c1">now</span><span>, </span><span class="c2">please</span></p>
<p class="c3"><span class="c3"><span></span></span></p>
<table><tr><td><p><span>Owner</span></p></td><td><p><span>Due</span></p></td></tr><tr><td><p><span></span></p></td><td></td></tr><tr><td><p><span>Ana</span></p></td><td><p><span>Friday</span></p></td></tr></table>
</body></html>"#;

fn service() -> FakeService {
    FakeService {
        export: EXPORT.to_string(),
        ..Default::default()
    }
}

#[test]
fn pull_to_stdout_returns_clean_markdown() {
    let service = service();
    let result = pull(&service, &FakeHistory::default(), DOC_ID, &PullTarget::Stdout).unwrap();
    let md = result.markdown;

    assert!(md.starts_with("# Status\n"));
    assert!(md.contains("Ship it**now**, *please*"));
    assert!(!md.contains('\u{a0}'));
    assert!(!md.contains("<span"));
    assert!(md.contains("| Owner | Due |"));
    assert!(md.contains("| Ana | Friday |"));
    assert!(!md.lines().any(|line| line.trim().chars().all(|c| c == '|' || c == ' ') && line.contains('|')));
    assert!(md.ends_with('\n') && !md.ends_with("\n\n"));
    assert!(result.written_to.is_none());
}

#[test]
fn pull_to_file_writes_the_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.md");
    let result = pull(
        &service(),
        &FakeHistory::default(),
        DOC_ID,
        &PullTarget::File(path.clone()),
    )
    .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), result.markdown);
    assert_eq!(result.written_to, Some(path));
}

#[test]
fn update_mode_overwrites_the_recorded_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("status.md");
    fs::write(&source, "old").unwrap();
    let history = FakeHistory::with_entry(DOC_ID, source.to_str().unwrap());

    pull(&service(), &history, DOC_ID, &PullTarget::UpdateSource).unwrap();

    assert!(fs::read_to_string(&source).unwrap().starts_with("# Status"));
}

#[test]
fn update_mode_without_history_fails_before_export() {
    let service = service();
    let err = pull(&service, &FakeHistory::default(), DOC_ID, &PullTarget::UpdateSource).unwrap_err();
    assert!(matches!(err, PipelineError::NoHistorySource { .. }));
    assert!(!service.calls().iter().any(|c| matches!(c, Call::Export(_))));
}
