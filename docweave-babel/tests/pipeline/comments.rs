use crate::common::{FakeService, DOC_ID};
use chrono::{Local, TimeZone};
use docweave_babel::comments::{extract_comments, CommentReport};
use docweave_babel::service::{CommentReply, CommentThread};

fn pulled_at() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, 3, 14, 5, 0).unwrap()
}

#[test]
fn no_comments_is_an_explicit_result() {
    let outcome = extract_comments(&FakeService::default(), DOC_ID, pulled_at()).unwrap();
    assert!(outcome.is_complete());
    assert_eq!(
        outcome.into_value(),
        CommentReport::Empty {
            title: "Design Notes".to_string()
        }
    );
}

#[test]
fn report_counts_open_and_resolved() {
    let service = FakeService {
        comments: vec![
            CommentThread {
                author: Some("Ana".into()),
                body: "Why?".into(),
                resolved: false,
                quoted: Some("x".repeat(120)),
                replies: vec![CommentReply {
                    author: None,
                    body: "Because".into(),
                }],
            },
            CommentThread {
                author: Some("Bo".into()),
                body: "Fixed".into(),
                resolved: true,
                quoted: None,
                replies: Vec::new(),
            },
        ],
        ..Default::default()
    };
    let outcome = extract_comments(&service, DOC_ID, pulled_at()).unwrap();
    let CommentReport::Report {
        markdown,
        open,
        resolved,
    } = outcome.into_value()
    else {
        panic!("expected a report");
    };
    assert_eq!((open, resolved), (1, 1));
    assert!(markdown.starts_with("## Feedback from: Design Notes\n> Pulled: 2024-06-03 14:05 from https://docs.google.com/document/d/doc-123/edit\n"));
    assert!(markdown.contains(&format!("(on \"{}...\")", "x".repeat(100))));
    assert!(markdown.contains("  - **Unknown** replied: \"Because\""));
    let open_at = markdown.find("### Open Comments").unwrap();
    let resolved_at = markdown.find("### Resolved Comments").unwrap();
    assert!(open_at < resolved_at);
}

#[test]
fn comment_fetch_failure_degrades() {
    let service = FakeService {
        fail_comments: true,
        ..Default::default()
    };
    let outcome = extract_comments(&service, DOC_ID, pulled_at()).unwrap();
    assert!(!outcome.is_complete());
    assert!(outcome.warnings()[0].contains("Could not fetch comments"));
    assert!(matches!(outcome.value(), CommentReport::Empty { .. }));
}
