use docweave_babel::formats::markdown::{CleanupProfile, MarkdownCleaner};
use proptest::prelude::*;

#[test]
fn test_export_cleanup_of_typical_residue() {
    let raw = "\n\n# Notes\u{a0}\n\nA\u{200b}B ** ** done\n\n\n\n| | |\n***\n[empty]()\n![](https://lh3.googleusercontent.com/abc)\n";
    let cleaned = MarkdownCleaner::export().clean(raw);
    assert_eq!(cleaned, "# Notes\n\nAB  done\n\n---\nempty\n");
}

#[test]
fn test_fenced_code_is_left_alone() {
    let raw = "```\n| | |\n** **\n***\n```\n";
    assert_eq!(MarkdownCleaner::export().clean(raw), raw);
}

#[test]
fn test_spaced_rule_lines_become_dashes() {
    let raw = "Intro\n\n* * *\n\n_ _ _\n\n- - - -\n\nA * * B\n";
    assert_eq!(
        MarkdownCleaner::export().clean(raw),
        "Intro\n\n---\n\n---\n\n---\n\nA  B\n"
    );
    assert_eq!(MarkdownCleaner::ingest().clean("* * *\n"), "---\n");
}

#[test]
fn test_ingest_profile_keeps_nbsp_and_pipe_rows() {
    let raw = "a\u{a0}b\n| | |\n";
    let cleaned = MarkdownCleaner::ingest().clean(raw);
    assert!(cleaned.contains('\u{a0}'));
    assert!(cleaned.contains("| | |"));
}

fn markdownish() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "# Heading",
        "text",
        " ",
        "\u{a0}",
        "\u{200b}",
        "**",
        "** **",
        "__ __",
        "* *",
        "*",
        "_",
        "[link]()",
        "![img]()",
        "![x](https://a.googleusercontent.com/i)",
        "| | |",
        "|a|b|",
        "---",
        "***",
        "```",
        "~~~",
        "\n",
        "\n\n\n",
        "\r\n",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_export_cleanup_is_idempotent(raw in markdownish()) {
        let cleaner = MarkdownCleaner::new(CleanupProfile::Export);
        let once = cleaner.clean(&raw);
        prop_assert_eq!(cleaner.clean(&once), once);
    }

    #[test]
    fn test_ingest_cleanup_is_idempotent(raw in markdownish()) {
        let cleaner = MarkdownCleaner::ingest();
        let once = cleaner.clean(&raw);
        prop_assert_eq!(cleaner.clean(&once), once);
    }
}
