use crate::common::{Call, FakeHistory, FakeService, DOC_ID};
use docweave_babel::publish::{push, PushRequest};
use docweave_babel::styling::StyleMutation;
use docweave_babel::StyleConfig;

#[test]
fn push_imports_once_styles_once_and_records_history() {
    let service = FakeService::default();
    let history = FakeHistory::default();
    let request = PushRequest::new("# Title\n\nSome *text*.", "Title").with_source("/work/title.md");

    let outcome = push(&service, &history, &StyleConfig::default(), &request).unwrap();

    assert!(outcome.is_complete(), "warnings: {:?}", outcome.warnings());
    assert_eq!(outcome.value().id, DOC_ID);

    let imports = service.imports();
    assert_eq!(imports.len(), 1);
    let Call::Import { title, html, parent } = &imports[0] else {
        unreachable!()
    };
    assert_eq!(title, "Title");
    assert!(html.contains("<h1"));
    assert!(html.contains("Title</h1>"));
    assert!(html.contains("<em>text</em>"));
    assert_eq!(parent, &None);

    let batches = service.batches();
    assert_eq!(batches.len(), 1);
    assert!(matches!(
        batches[0][0],
        StyleMutation::UpdateDocumentStyle { .. }
    ));

    let entries = history.entries.borrow();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, DOC_ID);
    assert_eq!(entries[0].source, "/work/title.md");
    assert_eq!(entries[0].title, "Title");
}

#[test]
fn import_happens_before_styling() {
    let service = FakeService::default();
    let request = PushRequest::new("# A", "A");
    push(&service, &FakeHistory::default(), &StyleConfig::default(), &request).unwrap();

    let calls = service.calls();
    let import = calls.iter().position(|c| matches!(c, Call::Import { .. }));
    let fetch = calls.iter().position(|c| matches!(c, Call::FetchStructure(_)));
    let batch = calls.iter().position(|c| matches!(c, Call::BatchUpdate { .. }));
    assert!(import < fetch && fetch < batch);
}

#[test]
fn existing_folder_is_reused() {
    let service = FakeService::default();
    service
        .folders
        .borrow_mut()
        .insert("Specs".to_string(), "folder-specs".to_string());
    let request = PushRequest::new("text", "Doc").with_folder("Specs");

    push(&service, &FakeHistory::default(), &StyleConfig::default(), &request).unwrap();

    assert!(!service
        .calls()
        .iter()
        .any(|c| matches!(c, Call::CreateFolder(_))));
    let Call::Import { parent, .. } = &service.imports()[0] else {
        unreachable!()
    };
    assert_eq!(parent.as_deref(), Some("folder-specs"));
}

#[test]
fn repeated_pushes_create_the_folder_once() {
    let service = FakeService::default();
    let history = FakeHistory::default();
    let styles = StyleConfig::default();
    for _ in 0..2 {
        let request = PushRequest::new("text", "Doc").with_folder("Inbox");
        push(&service, &history, &styles, &request).unwrap();
    }
    let creates = service
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::CreateFolder(_)))
        .count();
    assert_eq!(creates, 1);
    assert_eq!(history.entries.borrow().len(), 2);
}

#[test]
fn history_failure_is_a_warning() {
    let service = FakeService::default();
    let history = FakeHistory {
        fail: true,
        ..Default::default()
    };
    let outcome = push(
        &service,
        &history,
        &StyleConfig::default(),
        &PushRequest::new("x", "X"),
    )
    .unwrap();
    assert!(!outcome.is_complete());
    assert!(outcome.warnings()[0].contains("history"));
    assert_eq!(outcome.value().id, DOC_ID);
}
