use crate::common::{FakeHistory, FakeService, DOC_ID};
use docweave_babel::publish::{push, PushRequest};
use docweave_babel::styling::{apply_styling, plan_mutations, DocumentTree, StyleMutation};
use docweave_babel::StyleConfig;

#[test]
fn unreadable_structure_degrades_the_push() {
    let service = FakeService {
        fail_structure: true,
        ..Default::default()
    };
    let history = FakeHistory::default();
    let outcome = push(
        &service,
        &history,
        &StyleConfig::default(),
        &PushRequest::new("# T", "T").with_source("/tmp/t.md"),
    )
    .unwrap();

    assert!(!outcome.is_complete());
    assert!(outcome.warnings()[0].starts_with("Could not read document"));
    assert!(service.batches().is_empty());
    // The document exists, so it is still recorded.
    assert_eq!(history.entries.borrow().len(), 1);
}

#[test]
fn rejected_batch_is_reported_not_raised() {
    let service = FakeService {
        fail_batch: true,
        ..Default::default()
    };
    let outcome = apply_styling(&service, DOC_ID, &StyleConfig::default());
    assert!(!outcome.is_complete());
    assert!(!outcome.value().applied);
    assert!(outcome.value().mutations > 0);
}

#[test]
fn applied_batch_matches_the_plan() {
    let service = FakeService::default();
    let styles = StyleConfig::default();
    let outcome = apply_styling(&service, DOC_ID, &styles);
    assert!(outcome.is_complete());

    let planned = plan_mutations(
        &DocumentTree::from_json(&service.structure).unwrap(),
        &styles,
    );
    assert_eq!(service.batches(), vec![planned.clone()]);
    assert_eq!(outcome.value().mutations, planned.len());
}

#[test]
fn code_and_quote_paragraphs_are_recognized_from_imported_structure() {
    let json = r#"{"body": {"content": [
      {"startIndex": 1, "endIndex": 9, "paragraph": {
        "elements": [{"textRun": {"content": "let x;\n", "textStyle": {"weightedFontFamily": {"fontFamily": "Courier New"}}}}],
        "paragraphStyle": {"namedStyleType": "NORMAL_TEXT", "indentStart": {"magnitude": 40, "unit": "PT"}}}},
      {"startIndex": 9, "endIndex": 20, "paragraph": {
        "elements": [{"textRun": {"content": "A quote.\n"}}],
        "paragraphStyle": {"namedStyleType": "NORMAL_TEXT", "indentStart": {"magnitude": 36, "unit": "PT"}}}}
    ]}}"#;
    let tree = DocumentTree::from_json(json).unwrap();
    let mutations = plan_mutations(&tree, &StyleConfig::default());

    let code_text = mutations.iter().find_map(|m| match m {
        StyleMutation::UpdateTextStyle { range, text_style, .. } if range.start_index == 1 => {
            Some(text_style)
        }
        _ => None,
    });
    let code_text = code_text.unwrap();
    assert!(code_text.background_color.is_some());
    assert_eq!(
        code_text.weighted_font_family.as_ref().unwrap().font_family,
        "Roboto Mono"
    );

    let quote_text = mutations.iter().find_map(|m| match m {
        StyleMutation::UpdateTextStyle { range, text_style, .. } if range.start_index == 9 => {
            Some(text_style)
        }
        _ => None,
    });
    assert_eq!(quote_text.unwrap().italic, Some(true));
}

#[test]
fn invalid_colors_are_skipped() {
    let mut styles = StyleConfig::default();
    styles.body.color = Some("not-a-color".to_string());
    let tree = DocumentTree::from_json(&FakeService::default().structure).unwrap();
    let body = plan_mutations(&tree, &styles)
        .into_iter()
        .find_map(|m| match m {
            StyleMutation::UpdateTextStyle { range, text_style, fields } if range.start_index == 7 => {
                Some((text_style, fields))
            }
            _ => None,
        })
        .unwrap();
    assert!(body.0.foreground_color.is_none());
    assert!(!body.1.fields().contains(&"foregroundColor"));
    assert!(body.1.fields().contains(&"fontSize"));
}
