use docweave_babel::formats::html::{clean_html, html_to_markdown};
use docweave_babel::formats::markdown::CleanupProfile;

const EXPORT: &str = r#"<html><head><meta content="text/html; charset=UTF-8" http-equiv="content-type">
<style type="text/css">ul.lst-kix_abc-0{list-style-type:none}ul.lst-kix_abc-1{list-style-type:none}
.c4{font-family:"Courier New";font-size:10pt}.c5{font-weight:700}.c6{font-style:italic}.c7{color:#1155cc;text-decoration:underline}</style></head>
<body>
<h2 id="h.abc"><span class="c5">Plan</span></h2>
<ul class="c0 lst-kix_abc-0 start"><li class="c2"><span>First</span></li></ul>
<ul class="c0 lst-kix_abc-1 start"><li class="c2"><span>Nested</span></li></ul>
<p><span class="c4">fn main() {</span></p>
<p><span class="c4">}</span></p>
<p><span>See </span><span class="c7"><a href="https://www.google.com/url?q=https://example.com/docs&amp;sa=D&amp;ust=1">the docs</a></span><span class="c6">today</span></p>
<p><span></span></p>
<hr>
</body></html>"#;

#[test]
fn test_export_is_cleaned_of_presentation() {
    let html = clean_html(EXPORT).unwrap();
    assert!(!html.contains("<style"));
    assert!(!html.contains("<meta"));
    assert!(!html.contains("class="));
    assert!(!html.contains(" id="));
    assert!(!html.contains("<span></span>"));
    assert!(html.contains("href=\"https://example.com/docs\""));
}

#[test]
fn test_export_becomes_markdown() {
    let md = html_to_markdown(EXPORT, CleanupProfile::Export);

    // Heading weight is not promoted to emphasis.
    assert!(md.starts_with("## Plan\n"));
    assert!(md.contains("- First"));
    assert!(md.contains("    - Nested"));
    assert!(md.contains("```\nfn main() {\n}\n```"));
    assert!(md.contains("See [the docs](https://example.com/docs)*today*"));
    assert!(md.contains("\n---\n"));
    assert!(!md.contains("\n\n\n"));
}
