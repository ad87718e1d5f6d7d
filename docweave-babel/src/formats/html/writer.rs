//! HTML to Markdown writer
//!
//!     Walks a (cleaned) rcdom tree and produces Markdown with ATX headings and `-`
//!     bullets. Blocks are emitted with generous blank lines around them; the Markdown
//!     cleanup pass collapses those afterwards, so the writer never has to track how
//!     many newlines the previous block left behind.
//!
//!     Text outside `pre` has ASCII whitespace collapsed. Non-breaking spaces are kept
//!     as-is here and normalized by the cleanup.

use super::dom::{attribute, element_name, text_content};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "title", "script", "style", "noscript", "template", "svg", "button", "form",
    "iframe", "input", "select", "textarea",
];
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "figure", "figcaption",
    "aside", "nav", "address", "center",
];
const LIST_LEVEL_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_code: bool,
    in_cell: bool,
    in_list: bool,
}

#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    /// Marker for unordered list items.
    pub bullet: char,
    /// Escape `*` and `_` in text so they are not read as emphasis.
    pub escape_emphasis: bool,
}

impl Default for MarkdownWriter {
    fn default() -> Self {
        Self {
            bullet: '-',
            escape_emphasis: true,
        }
    }
}

impl MarkdownWriter {
    pub fn write(&self, dom: &RcDom) -> String {
        self.children(&dom.document, Context::default())
    }

    fn children(&self, node: &Handle, ctx: Context) -> String {
        node.children
            .borrow()
            .iter()
            .map(|child| self.node(child, ctx))
            .collect()
    }

    fn node(&self, node: &Handle, ctx: Context) -> String {
        match node.data {
            NodeData::Text { ref contents } => self.text(&contents.borrow(), ctx),
            NodeData::Element { .. } => self.element(node, ctx),
            NodeData::Document => self.children(node, ctx),
            _ => String::new(),
        }
    }

    fn text(&self, text: &str, ctx: Context) -> String {
        let collapsed = collapse_ascii_whitespace(text);
        if ctx.in_code || !self.escape_emphasis {
            collapsed
        } else {
            collapsed.replace('*', "\\*").replace('_', "\\_")
        }
    }

    fn element(&self, node: &Handle, ctx: Context) -> String {
        let Some(tag) = element_name(node) else {
            return String::new();
        };

        if SKIPPED_ELEMENTS.contains(&tag) {
            return String::new();
        }
        if BLOCK_ELEMENTS.contains(&tag) {
            return block(self.children(node, ctx).trim());
        }

        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                let text = single_line(&self.children(node, ctx));
                if text.is_empty() {
                    String::new()
                } else {
                    block(&format!("{} {text}", "#".repeat(level)))
                }
            }
            "br" => {
                if ctx.in_cell {
                    " ".to_string()
                } else {
                    "\n".to_string()
                }
            }
            "hr" => block("---"),
            "strong" | "b" => wrap_inline(&self.children(node, ctx), "**", ctx),
            "em" | "i" => wrap_inline(&self.children(node, ctx), "*", ctx),
            "del" | "s" | "strike" => wrap_inline(&self.children(node, ctx), "~~", ctx),
            "code" | "kbd" | "samp" | "tt" => self.inline_code(node, ctx),
            "pre" => fenced_code(&text_content(node)),
            "a" => self.link(node, ctx),
            "img" => image(node),
            "ul" => self.list(node, false, ctx),
            "ol" => self.list(node, true, ctx),
            "blockquote" => {
                let inner = self.children(node, ctx);
                let mut quoted: Vec<String> = Vec::new();
                for line in inner.trim().lines().map(str::trim_end) {
                    if line.is_empty() {
                        if quoted.last().is_some_and(|l| l != ">") {
                            quoted.push(">".to_string());
                        }
                    } else {
                        quoted.push(format!("> {line}"));
                    }
                }
                block(&quoted.join("\n"))
            }
            "table" => self.table(node, ctx),
            "dl" => block(self.children(node, ctx).trim()),
            "dt" => format!("\n\n{}\n", single_line(&self.children(node, ctx))),
            "dd" => format!(": {}\n", single_line(&self.children(node, ctx))),
            _ => self.children(node, ctx),
        }
    }

    fn inline_code(&self, node: &Handle, ctx: Context) -> String {
        if ctx.in_code {
            return self.children(node, ctx);
        }
        let content = self.children(
            node,
            Context {
                in_code: true,
                ..ctx
            },
        );
        if content.trim().is_empty() {
            return content;
        }
        if content.contains('`') {
            format!("`` {content} ``")
        } else {
            format!("`{content}`")
        }
    }

    fn link(&self, node: &Handle, ctx: Context) -> String {
        let text = self.children(node, ctx);
        let label = text.trim();
        let href = attribute(node, "href").unwrap_or_default();
        let href = href.trim();

        if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
            return text;
        }
        if label.is_empty() {
            return String::new();
        }

        let target = href.replace(' ', "%20").replace('(', "%28").replace(')', "%29");
        if label == href || label.replace("\\_", "_") == href {
            return format!("<{target}>");
        }
        match attribute(node, "title").filter(|t| !t.is_empty()) {
            Some(title) => format!("[{label}]({target} \"{}\")", title.replace('"', "\\\"")),
            None => format!("[{label}]({target})"),
        }
    }

    fn list(&self, node: &Handle, ordered: bool, ctx: Context) -> String {
        let mut number = attribute(node, "start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let item_ctx = Context {
            in_list: true,
            ..ctx
        };

        let mut items = Vec::new();
        for child in node.children.borrow().iter() {
            if element_name(child) != Some("li") {
                continue;
            }
            let marker = if ordered {
                let marker = format!("{number}.");
                number += 1;
                marker
            } else {
                self.bullet.to_string()
            };
            let body = self.children(child, item_ctx);
            items.push(list_item(&marker, body.trim()));
        }

        if items.is_empty() {
            return String::new();
        }

        let level = attribute(node, "data-list-level")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(0);
        let joined = indent(&items.join("\n"), level * LIST_LEVEL_INDENT);

        if ctx.in_list {
            format!("\n{joined}\n")
        } else {
            block(&joined)
        }
    }

    fn table(&self, node: &Handle, ctx: Context) -> String {
        let cell_ctx = Context {
            in_cell: true,
            ..ctx
        };
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in table_rows(node) {
            let cells = row
                .children
                .borrow()
                .iter()
                .filter(|cell| matches!(element_name(cell), Some("td") | Some("th")))
                .map(|cell| {
                    self.children(cell, cell_ctx)
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .replace('|', "\\|")
                })
                .collect::<Vec<_>>();
            if cells.iter().any(|cell| !cell.is_empty()) {
                rows.push(cells);
            }
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return String::new();
        }
        for row in &mut rows {
            row.resize(width, String::new());
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(table_line(&rows[0]));
        lines.push(table_line(&vec!["---".to_string(); width]));
        lines.extend(rows[1..].iter().map(|row| table_line(row)));
        block(&lines.join("\n"))
    }
}

fn block(content: &str) -> String {
    if content.is_empty() {
        String::new()
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_ascii_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Wrap inline content in a marker, keeping surrounding spaces outside of it.
fn wrap_inline(content: &str, marker: &str, ctx: Context) -> String {
    let trimmed = content.trim();
    if ctx.in_code || trimmed.is_empty() {
        return content.to_string();
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{marker}{trimmed}{marker}{trailing}")
}

fn fenced_code(code: &str) -> String {
    let code = code.trim_end_matches('\n');
    let fence = if code.contains("```") { "~~~" } else { "```" };
    block(&format!("{fence}\n{code}\n{fence}"))
}

fn image(node: &Handle) -> String {
    let src = attribute(node, "src").unwrap_or_default();
    if src.trim().is_empty() {
        return String::new();
    }
    let alt = attribute(node, "alt").unwrap_or_default();
    format!("![{}]({})", single_line(&alt), src.trim().replace(' ', "%20"))
}

fn list_item(marker: &str, body: &str) -> String {
    let continuation = " ".repeat(marker.len() + 1);
    let mut lines = body.lines();
    let first = lines.next().unwrap_or_default();
    let mut item = format!("{marker} {first}");
    for line in lines {
        item.push('\n');
        if !line.is_empty() {
            item.push_str(&continuation);
            item.push_str(line);
        }
    }
    item
}

fn indent(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `tr` elements of a table, looking through `thead`/`tbody`/`tfoot` but not into nested tables.
fn table_rows(table: &Handle) -> Vec<Handle> {
    let mut rows = Vec::new();
    for child in table.children.borrow().iter() {
        match element_name(child) {
            Some("tr") => rows.push(child.clone()),
            Some("thead") | Some("tbody") | Some("tfoot") => rows.extend(table_rows(child)),
            _ => {}
        }
    }
    rows
}

fn table_line(cells: &[String]) -> String {
    let cells = cells
        .iter()
        .map(|cell| if cell.is_empty() { " ".to_string() } else { cell.clone() })
        .collect::<Vec<_>>();
    format!("| {} |", cells.join(" | "))
}
