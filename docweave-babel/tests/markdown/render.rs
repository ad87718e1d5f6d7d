use docweave_babel::formats::markdown::{render_html, render_import_html};
use docweave_babel::StyleConfig;

#[test]
fn test_tables_render_as_html_tables() {
    let html = render_html("| A | B |\n|---|---|\n| 1 | 2 |\n");
    assert!(html.contains("<table>"));
    assert!(html.contains("<th>A</th>"));
    assert!(html.contains("<td>2</td>"));
}

#[test]
fn test_footnotes_and_strikethrough() {
    let html = render_html("Claim[^1] and ~~gone~~.\n\n[^1]: Source.\n");
    assert!(html.contains("<del>gone</del>"));
    assert!(html.contains("footnote"));
}

#[test]
fn test_ordered_lists_keep_their_start() {
    let html = render_html("3. three\n4. four\n");
    assert!(html.contains("<ol start=\"3\">"));
}

#[test]
fn test_headings_carry_anchor_ids() {
    let html = render_html("# Title\n\nSome *text*.\n");
    let heading = &html[html.find("<h1").unwrap()..html.find("</h1>").unwrap()];
    assert!(heading.contains(r#"id="title""#));
}

#[test]
fn test_raw_html_passes_through() {
    let html = render_html("<div class=\"note\">kept</div>\n");
    assert!(html.contains("<div class=\"note\">kept</div>"));
}

#[test]
fn test_import_page_carries_title_and_styles() {
    let styles = StyleConfig::default();
    let page = render_import_html("# Hello\n", "Q3 <Plan>", &styles);
    assert!(page.starts_with("<!DOCTYPE html>") || page.starts_with("<html"));
    assert!(page.contains("<title>Q3 &lt;Plan&gt;</title>"));
    assert!(page.contains("Hello</h1>"));
    assert!(page.contains("--body-color: #1a1a1a"));
    assert!(!page.contains("{{"));
}

#[test]
fn test_css_overrides_reach_the_page() {
    let mut styles = StyleConfig::default();
    styles
        .css
        .insert("link_color".to_string(), "#ff0000".to_string());
    let page = render_import_html("[x](https://example.com)\n", "T", &styles);
    assert!(page.contains("#ff0000"));
}
