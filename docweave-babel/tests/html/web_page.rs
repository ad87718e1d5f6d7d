use docweave_babel::formats::html::html_to_markdown;
use docweave_babel::formats::markdown::CleanupProfile;

const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Article</title><script>track()</script></head>
<body>
<nav><a href="/">Home</a></nav>
<article>
<h1>Release notes</h1>
<p>Version <code>2.0</code> ships <strong>today</strong>.</p>
<blockquote><p>Fast.</p><p>Small.</p></blockquote>
<ol start="2"><li>Second</li><li>Third</li></ol>
<pre><code>cargo install thing
</code></pre>
<table><thead><tr><th>Name</th><th>Value</th></tr></thead>
<tbody><tr><td>a|b</td><td>1</td></tr></tbody></table>
<dl><dt>Term</dt><dd>Meaning</dd></dl>
<p><img src="/img/logo.png" alt="Logo"> <a href="https://example.com">https://example.com</a></p>
</article>
</body></html>"#;

#[test]
fn test_web_page_structure_survives() {
    let md = html_to_markdown(PAGE, CleanupProfile::Ingest);

    assert!(!md.contains("track()"));
    assert!(md.contains("# Release notes\n"));
    assert!(md.contains("Version `2.0` ships **today**."));
    assert!(md.contains("> Fast.\n>\n> Small."));
    assert!(md.contains("2. Second\n3. Third"));
    assert!(md.contains("```\ncargo install thing\n```"));
    assert!(md.contains("| Name | Value |\n| --- | --- |\n| a\\|b | 1 |"));
    assert!(md.contains("Term\n: Meaning"));
    assert!(md.contains("![Logo](/img/logo.png) <https://example.com>"));
}
