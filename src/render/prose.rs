//! Tag-markup formatter: turns a documentation comment into Markdown prose.
//!
//! Block-level tags (`summary`, `param`, `returns`, `remarks`, ...) become
//! paragraphs, headed sections or bullet lists. Everything nested inside them
//! is formatted inline. Unknown tags fall back to a heading named after the
//! tag, so every element renders to something.

use super::naming::{capitalize, format_cref};
use crate::error::MarkupError;
use crate::markup::{self, Element, Node};
use regex::Regex;
use std::sync::LazyLock;

static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Render normalized markup. Section headings are emitted at `level + 1`.
pub fn render(markup: &str, level: usize) -> Result<String, MarkupError> {
    let nodes = markup::parse(markup)?;
    let mut out = String::new();
    let siblings: Vec<&Element> = nodes
        .iter()
        .filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
        .collect();

    let mut index = 0;
    for node in &nodes {
        match node {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push_str(text);
                    out.push_str("\n\n");
                }
            }
            Node::Element(element) => {
                let first = !siblings[..index].iter().any(|e| e.name == element.name);
                let last = !siblings[index + 1..].iter().any(|e| e.name == element.name);
                block(&mut out, element, level + 1, first, last);
                index += 1;
            }
        }
    }
    Ok(out)
}

/// Fallback for markup that failed to parse: a visible marker, then the raw
/// text in a code fence so its tags are shown rather than read as HTML.
pub fn parse_error_block(error: &MarkupError, raw: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(raw).max(2) + 1);
    format!(
        "> **Documentation parse error:** {}\n\n{}xml\n{}\n{}\n\n",
        error, fence, raw, fence
    )
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

fn heading(level: usize, title: &str) -> String {
    format!("{} {}\n", "#".repeat(level.clamp(1, 6)), title)
}

/// One top-level element. `first`/`last` tell whether it is the first or last
/// sibling with the same tag name, for list headings and spacing.
fn block(out: &mut String, el: &Element, level: usize, first: bool, last: bool) {
    match el.name.as_str() {
        "summary" => {
            paragraph(out, &inline(&el.children));
        }
        "param" | "typeparam" => {
            if first {
                out.push_str(&heading(level, &format!("{}eters", capitalize(&el.name))));
            }
            let name = el.attr("name").unwrap_or_default();
            out.push_str(&format!("- {}: {}\n", name, inline(&el.children)));
        }
        "returns" => {
            out.push_str(&heading(level, "Returns"));
            paragraph(out, &labeled(&el.children));
        }
        "value" => {
            out.push_str(&heading(level, "Value"));
            paragraph(out, &inline(&el.children));
        }
        "exception" => {
            if first {
                out.push_str(&heading(level, "Exceptions"));
            }
            let cref = format_cref(el.attr("cref").unwrap_or_default());
            out.push_str(&format!("- {}: {}\n", cref, inline(&el.children)));
        }
        "seealso" => {
            if first {
                out.push_str(&heading(level, "See Also"));
            }
            let text = inline(&el.children);
            let entry = if let Some(cref) = el.attr_non_empty("cref") {
                format_cref(cref)
            } else if let Some(href) = el.attr_non_empty("href") {
                link(&text, href)
            } else {
                text
            };
            out.push_str(&format!("- {}\n", entry));
        }
        "para" | "code" | "list" | "c" | "see" | "paramref" | "typeparamref" => {
            let mut text = String::new();
            inline_element(&mut text, el);
            paragraph(out, &tidy(&text));
        }
        // remarks, example and anything custom
        _ => {
            out.push_str(&heading(level, &capitalize(&el.name)));
            paragraph(out, &inline(&el.children));
        }
    }

    if last && matches!(el.name.as_str(), "param" | "typeparam" | "exception" | "seealso") {
        out.push('\n');
    }
}

fn paragraph(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str("\n\n");
}

fn link(text: &str, href: &str) -> String {
    let text = if text.is_empty() { href } else { text };
    format!("[{}]({})", text, href)
}

/// Format nodes as running text.
fn inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => inline_element(&mut out, el),
        }
    }
    tidy(&out)
}

fn inline_element(out: &mut String, el: &Element) {
    match el.name.as_str() {
        "c" => out.push_str(&format!("`{}`", el.text())),
        "code" => {
            out.push_str("\n```csharp\n");
            out.push_str(el.text().trim());
            out.push_str("\n```\n");
        }
        "para" => {
            out.push_str("\n\n");
            out.push_str(&inline(&el.children));
            out.push_str("\n\n");
        }
        "see" => {
            if let Some(cref) = el.attr_non_empty("cref") {
                out.push_str(&format!("`{}`", format_cref(cref)));
            } else if let Some(href) = el.attr_non_empty("href") {
                out.push_str(&link(&inline(&el.children), href));
            } else if let Some(word) = el.attr_non_empty("langword") {
                out.push_str(&format!("`{}`", word));
            } else {
                out.push_str(&inline(&el.children));
            }
        }
        "paramref" | "typeparamref" => {
            out.push_str(&format!("`{}`", el.attr("name").unwrap_or_default()));
        }
        "list" => out.push_str(&list(el)),
        _ => out.push_str(&inline(&el.children)),
    }
}

/// `returns` body: each `<c>` span starts a segment and becomes its bold label.
fn labeled(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Element(el) if el.name == "c" => {
                let trimmed = out.trim_end().len();
                out.truncate(trimmed);
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&format!("**{}**", el.text().trim()));
            }
            Node::Element(el) => inline_element(&mut out, el),
            Node::Text(text) => out.push_str(text),
        }
    }
    tidy(&out)
}

fn list(el: &Element) -> String {
    let style = el.attr("type").unwrap_or("bullet");
    let items: Vec<(Option<String>, String)> = el
        .elements()
        .filter(|e| e.name == "item")
        .map(|item| {
            let term = item.child("term").map(|t| inline(&t.children));
            let description = match item.child("description") {
                Some(d) => inline(&d.children),
                None if term.is_none() => inline(&item.children),
                None => String::new(),
            };
            (term, description)
        })
        .collect();

    let mut out = String::from("\n\n");
    match style {
        "table" => {
            out.push_str("| Term | Description |\n");
            out.push_str("|------|-------------|\n");
            for (term, description) in &items {
                out.push_str(&format!(
                    "| {} | {} |\n",
                    cell(term.as_deref().unwrap_or_default()),
                    cell(description)
                ));
            }
        }
        "number" => {
            for (i, (term, description)) in items.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, list_entry(term.as_deref(), description)));
            }
        }
        _ => {
            for (term, description) in &items {
                out.push_str(&format!("- {}\n", list_entry(term.as_deref(), description)));
            }
        }
    }
    out.push('\n');
    out
}

fn list_entry(term: Option<&str>, description: &str) -> String {
    match term {
        Some(term) => format!("**{}**: {}", term, description),
        None => description.to_string(),
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn tidy(text: &str) -> String {
    RE_BLANK_RUN.replace_all(text.trim(), "\n\n").into_owned()
}
