//! Cleaning of exported HTML before Markdown conversion
//!
//!     Document services export HTML that is heavy on presentation and light on
//!     semantics: every run of text sits in a `<span class="cN">` whose meaning lives in
//!     a generated stylesheet, code blocks are paragraphs in a monospace font, links go
//!     through a redirect, and list nesting is encoded in class names.
//!
//!     [`HtmlCleaner`] rewrites the tree in place:
//!
//!     - `style`, `script`, `meta` and `link` elements are removed with their contents.
//!     - Spans whose class rules (or inline style) say bold, italic or monospace become
//!       `strong`, `em` and `code`. Headings and table header cells are left alone since
//!       their weight is a property of the block, not of the text.
//!     - Runs of paragraphs set entirely in a monospace font become one `pre` block.
//!     - Spans with no text and no child elements are removed. This runs after the
//!       children are cleaned, so spans that only held empty spans go as well.
//!     - Redirect links (`https://www.google.com/url?q=...`) point at their target.
//!     - List nesting encoded as `lst-kix_<id>-<level>` classes survives as a
//!       `data-list-level` attribute.
//!     - `class`, `style` and `id` attributes are stripped everywhere.

use super::dom::{
    append_child, attribute, create_element, create_text, element_name, has_element_children,
    remove_attributes, set_attribute, text_content,
};
use crate::style::is_monospace_font;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use url::Url;

const REMOVED_ELEMENTS: &[&str] = &["style", "script", "meta", "link"];
const STRIPPED_ATTRIBUTES: &[&str] = &["class", "style", "id"];
const BLOCK_WEIGHT_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "th"];

static CLASS_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([A-Za-z_][\w-]*)\s*\{([^}]*)\}").expect("static regex"));
static LIST_LEVEL_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"lst-kix_\w+-(\d+)").expect("static regex"));

/// Inline semantics carried by a span's presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Emphasis {
    bold: bool,
    italic: bool,
    monospace: bool,
}

impl Emphasis {
    fn from_declarations(declarations: &str) -> Self {
        let mut emphasis = Emphasis::default();
        for declaration in declarations.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim().to_lowercase();
            match property.trim().to_lowercase().as_str() {
                "font-weight" => {
                    emphasis.bold = value == "bold"
                        || value == "bolder"
                        || value.parse::<u16>().map(|w| w >= 600).unwrap_or(false);
                }
                "font-style" => emphasis.italic = value == "italic" || value == "oblique",
                "font-family" => emphasis.monospace = is_monospace_font(&value),
                _ => {}
            }
        }
        emphasis
    }

    fn union(self, other: Emphasis) -> Emphasis {
        Emphasis {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            monospace: self.monospace || other.monospace,
        }
    }

    /// Wrapper elements, outermost first.
    fn tags(self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.bold {
            tags.push("strong");
        }
        if self.italic {
            tags.push("em");
        }
        if self.monospace {
            tags.push("code");
        }
        tags
    }
}

/// Emphasis per class name, read from the document's stylesheets.
#[derive(Debug, Default)]
struct ClassStyles(HashMap<String, Emphasis>);

impl ClassStyles {
    fn collect(dom: &RcDom) -> Self {
        let mut css = String::new();
        collect_stylesheets(&dom.document, &mut css);

        let mut styles = HashMap::new();
        for rule in CLASS_RULE.captures_iter(&css) {
            let emphasis = Emphasis::from_declarations(&rule[2]);
            styles
                .entry(rule[1].to_string())
                .and_modify(|e: &mut Emphasis| *e = e.union(emphasis))
                .or_insert(emphasis);
        }
        ClassStyles(styles)
    }

    fn emphasis_of(&self, node: &Handle) -> Emphasis {
        let from_classes = attribute(node, "class")
            .map(|classes| {
                classes
                    .split_whitespace()
                    .filter_map(|class| self.0.get(class).copied())
                    .fold(Emphasis::default(), Emphasis::union)
            })
            .unwrap_or_default();
        let inline = attribute(node, "style")
            .map(|style| Emphasis::from_declarations(&style))
            .unwrap_or_default();
        from_classes.union(inline)
    }
}

fn collect_stylesheets(node: &Handle, out: &mut String) {
    if element_name(node) == Some("style") {
        out.push_str(&text_content(node));
        out.push('\n');
        return;
    }
    for child in node.children.borrow().iter() {
        collect_stylesheets(child, out);
    }
}

/// In-place cleaner for exported or fetched HTML.
#[derive(Debug, Clone)]
pub struct HtmlCleaner {
    /// Turn class-styled spans into semantic inline elements.
    pub promote_inline_styles: bool,
    /// Merge monospace paragraphs into `pre` blocks.
    pub detect_code_blocks: bool,
    /// Replace redirect links with their target.
    pub unwrap_redirects: bool,
}

impl Default for HtmlCleaner {
    fn default() -> Self {
        Self {
            promote_inline_styles: true,
            detect_code_blocks: true,
            unwrap_redirects: true,
        }
    }
}

impl HtmlCleaner {
    pub fn clean(&self, dom: &RcDom) {
        let classes = if self.promote_inline_styles || self.detect_code_blocks {
            ClassStyles::collect(dom)
        } else {
            ClassStyles::default()
        };
        self.clean_children(&dom.document, &classes, false);
    }

    fn clean_children(&self, node: &Handle, classes: &ClassStyles, block_weight: bool) {
        let children: Vec<Handle> = node.children.borrow().clone();
        let mut kept = Vec::with_capacity(children.len());
        let mut code_lines: Vec<String> = Vec::new();

        for child in children {
            let tag = element_name(&child).map(str::to_owned);
            let tag = tag.as_deref();

            if tag.is_some_and(|t| REMOVED_ELEMENTS.contains(&t)) {
                continue;
            }

            if tag == Some("p") && self.detect_code_blocks && is_code_paragraph(&child, classes) {
                code_lines.push(text_content(&child));
                continue;
            }
            if !code_lines.is_empty() {
                // Whitespace between two code paragraphs does not end the block.
                if is_blank_text(&child) {
                    continue;
                }
                kept.push(code_block(node, &code_lines));
                code_lines.clear();
            }

            let child_weight = block_weight || tag.is_some_and(|t| BLOCK_WEIGHT_ELEMENTS.contains(&t));
            self.clean_children(&child, classes, child_weight);

            match tag {
                Some("span") => {
                    if is_empty_span(&child) {
                        continue;
                    }
                    let emphasis = if self.promote_inline_styles && !block_weight {
                        classes.emphasis_of(&child)
                    } else {
                        Emphasis::default()
                    };
                    remove_attributes(&child, STRIPPED_ATTRIBUTES);
                    if emphasis != Emphasis::default() {
                        kept.push(wrap_children(node, &child, emphasis));
                        continue;
                    }
                }
                Some("ul") | Some("ol") => {
                    if let Some(level) = list_level(&child) {
                        set_attribute(&child, "data-list-level", &level.to_string());
                    }
                    remove_attributes(&child, STRIPPED_ATTRIBUTES);
                }
                Some("a") => {
                    if self.unwrap_redirects {
                        if let Some(target) = attribute(&child, "href").and_then(|h| unwrap_redirect(&h)) {
                            set_attribute(&child, "href", &target);
                        }
                    }
                    remove_attributes(&child, STRIPPED_ATTRIBUTES);
                }
                Some(_) => remove_attributes(&child, STRIPPED_ATTRIBUTES),
                None => {}
            }
            kept.push(child);
        }

        if !code_lines.is_empty() {
            kept.push(code_block(node, &code_lines));
        }

        *node.children.borrow_mut() = kept;
    }
}

fn is_blank_text(node: &Handle) -> bool {
    match node.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}

fn is_empty_span(node: &Handle) -> bool {
    text_content(node).trim().is_empty() && !has_element_children(node)
}

/// A paragraph whose visible text all sits in monospace spans.
fn is_code_paragraph(paragraph: &Handle, classes: &ClassStyles) -> bool {
    if text_content(paragraph).trim().is_empty() {
        return false;
    }
    paragraph.children.borrow().iter().all(|child| match child.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        NodeData::Element { .. } => {
            text_content(child).trim().is_empty()
                || (element_name(child) == Some("span") && classes.emphasis_of(child).monospace)
        }
        _ => true,
    })
}

fn code_block(parent: &Handle, lines: &[String]) -> Handle {
    let pre = create_element("pre");
    append_child(&pre, create_text(&lines.join("\n")));
    pre.parent.set(Some(std::rc::Rc::downgrade(parent)));
    pre
}

fn wrap_children(parent: &Handle, span: &Handle, emphasis: Emphasis) -> Handle {
    let tags = emphasis.tags();
    let outer = create_element(tags[0]);
    let mut inner = outer.clone();
    for tag in &tags[1..] {
        let element = create_element(tag);
        append_child(&inner, element.clone());
        inner = element;
    }
    for grandchild in span.children.take() {
        append_child(&inner, grandchild);
    }
    outer.parent.set(Some(std::rc::Rc::downgrade(parent)));
    outer
}

fn list_level(list: &Handle) -> Option<u32> {
    let classes = attribute(list, "class")?;
    LIST_LEVEL_CLASS
        .captures(&classes)
        .and_then(|caps| caps[1].parse().ok())
}

/// Target of a `https://www.google.com/url?q=<target>` redirect.
pub fn unwrap_redirect(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?;
    if !(host == "www.google.com" || host == "google.com") || url.path() != "/url" {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|target| !target.is_empty())
}
