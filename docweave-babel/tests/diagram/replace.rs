use docweave_babel::diagram::{extract_blocks, replace_spans, DiagramKind};
use proptest::prelude::*;

fn document(blocks: &[(usize, String)], prose: &[String]) -> String {
    let mut doc = String::new();
    for (i, (kind, body)) in blocks.iter().enumerate() {
        doc.push_str(&prose[i]);
        doc.push_str("\n```");
        doc.push_str(DiagramKind::ALL[*kind].tag());
        doc.push('\n');
        doc.push_str(body);
        doc.push_str("\n```\n");
    }
    doc.push_str(&prose[blocks.len()]);
    doc
}

proptest! {
    #[test]
    fn test_extraction_finds_every_allow_listed_block(
        blocks in prop::collection::vec((0..DiagramKind::ALL.len(), "[a-z ;>-]{1,20}"), 0..5),
        prose in prop::collection::vec("[A-Za-z .é]{0,30}", 6),
    ) {
        let doc = document(&blocks, &prose);
        let found = extract_blocks(&doc);
        prop_assert_eq!(found.len(), blocks.len());
        for (block, (kind, body)) in found.iter().zip(&blocks) {
            prop_assert_eq!(block.kind, DiagramKind::ALL[*kind]);
            prop_assert_eq!(&block.source, body.trim());
            prop_assert!(doc[block.start..block.end].starts_with("```"));
            prop_assert!(doc[block.start..block.end].ends_with("```"));
        }
    }

    #[test]
    fn test_replacing_any_subset_keeps_untouched_text(
        blocks in prop::collection::vec((0..DiagramKind::ALL.len(), "[a-z ;>-]{1,20}"), 1..5),
        prose in prop::collection::vec("[A-Za-z .é]{0,30}", 6),
        mask in prop::collection::vec(any::<bool>(), 5),
    ) {
        let doc = document(&blocks, &prose);
        let found = extract_blocks(&doc);
        let replacements: Vec<(usize, usize, String)> = found
            .iter()
            .enumerate()
            .filter(|(i, _)| mask[*i])
            .map(|(i, b)| (b.start, b.end, format!("![d{i}](./d-{i}.png)")))
            .collect();

        let updated = replace_spans(&doc, &replacements);

        // Rebuild the expected text by splicing forward.
        let mut expected = String::new();
        let mut cursor = 0;
        for (start, end, text) in &replacements {
            expected.push_str(&doc[cursor..*start]);
            expected.push_str(text);
            cursor = *end;
        }
        expected.push_str(&doc[cursor..]);
        prop_assert_eq!(&updated, &expected);

        for (i, block) in found.iter().enumerate() {
            if !mask[i] {
                prop_assert!(updated.contains(&doc[block.start..block.end]));
            }
        }
        for p in &prose[..=blocks.len()] {
            prop_assert!(updated.contains(p.as_str()));
        }
    }
}
