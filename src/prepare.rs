//! Input preparation: structure-preserving HTML-to-text conversion.
//!
//! Versioned documents may carry rich-text HTML; diffing the markup itself
//! produces noisy hunks over attribute churn, so the engine can flatten it
//! to indented plain text first. Parse trouble degrades to a pretty-printed
//! rendering of the original markup rather than failing the diff.

use std::sync::LazyLock;

use ego_tree::NodeRef;
use regex::Regex;
use scraper::node::Node;
use scraper::Html;
use tracing::debug;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("Invalid regex"));
static BLOCK_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(p|div|h[1-6]|ul|ol|li|br)\b").expect("Invalid regex"));

/// Tags rendered one-per-line without indenting their children.
const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Prepare raw content for diffing.
///
/// With `extract_text_from_html` off, or for content that does not look
/// like HTML, the input passes through unchanged.
pub fn prepare(text: &str, extract_text_from_html: bool) -> String {
    if !extract_text_from_html || !looks_like_html(text) {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    if !fragment.errors.is_empty() {
        debug!(
            errors = fragment.errors.len(),
            "HTML parse reported errors, falling back to pretty-printed markup"
        );
        return pretty_print(text);
    }

    let rendered = render_children(*fragment.root_element(), 0, true);
    collapse_blank_runs(&rendered)
}

/// Content heuristic: a tag-like pattern plus at least one block tag.
fn looks_like_html(text: &str) -> bool {
    TAG_PATTERN.is_match(text) && BLOCK_TAG_PATTERN.is_match(text)
}

/// Recursively render a node's children.
///
/// `block` contexts (the root, list containers) newline-join their parts;
/// inline contexts space-join. `list_depth` counts enclosing lists for
/// list-item indentation.
fn render_children(node: NodeRef<'_, Node>, list_depth: usize, block: bool) -> String {
    let children: Vec<NodeRef<'_, Node>> = node.children().collect();
    let last = children.len().saturating_sub(1);
    let mut parts: Vec<String> = Vec::new();

    for (idx, child) in children.iter().enumerate() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Node::Element(element) => match element.name() {
                "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let inner = render_children(*child, list_depth, false);
                    if !inner.is_empty() {
                        parts.push(inner);
                    }
                    if idx != last {
                        parts.push(String::new());
                    }
                }
                "br" => parts.push(String::new()),
                "ul" | "ol" => {
                    let inner = render_children(*child, list_depth + 1, true);
                    if !inner.is_empty() {
                        parts.push(inner);
                    }
                }
                "li" => render_list_item(*child, list_depth, &mut parts),
                "strong" | "b" | "em" | "i" | "code" | "span" | "a" => {
                    let inner = render_children(*child, list_depth, false);
                    if !inner.is_empty() {
                        parts.push(inner);
                    }
                }
                // Unknown elements recurse transparently in the current context.
                _ => {
                    let inner = render_children(*child, list_depth, block);
                    if !inner.is_empty() {
                        parts.push(inner);
                    }
                }
            },
            _ => {}
        }
    }

    if block {
        parts.join("\n")
    } else {
        parts.join(" ")
    }
}

/// Render an `li`: a `"- "` marker indented by nesting depth, with nested
/// lists flushed onto their own lines.
fn render_list_item(node: NodeRef<'_, Node>, list_depth: usize, parts: &mut Vec<String>) {
    let indent = "  ".repeat(list_depth.saturating_sub(1));
    let mut text_parts: Vec<String> = Vec::new();
    let mut nested_lists: Vec<String> = Vec::new();

    for child in node.children() {
        let is_list =
            matches!(child.value(), Node::Element(el) if matches!(el.name(), "ul" | "ol"));
        if is_list {
            let nested = render_children(child, list_depth + 1, true);
            if !nested.is_empty() {
                nested_lists.push(nested);
            }
        } else {
            let piece = match child.value() {
                Node::Text(text) => text.trim().to_string(),
                Node::Element(_) => render_children(child, list_depth, false),
                _ => String::new(),
            };
            if !piece.is_empty() {
                text_parts.push(piece);
            }
        }
    }

    parts.push(format!("{indent}- {}", text_parts.join(" ")));
    parts.extend(nested_lists);
}

/// Collapse runs of 3+ blank lines to a single blank line.
fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blanks = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            blanks += 1;
            continue;
        }
        push_blanks(&mut out, blanks);
        blanks = 0;
        out.push(line);
    }
    push_blanks(&mut out, blanks);

    out.join("\n")
}

fn push_blanks<'a>(out: &mut Vec<&'a str>, blanks: usize) {
    let keep = if blanks >= 3 { 1 } else { blanks };
    for _ in 0..keep {
        out.push("");
    }
}

/// Indented, one-tag-per-line rendering of markup the parser rejected.
fn pretty_print(html: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(start) = rest.find('<') else {
            push_text(&mut out, rest, depth);
            break;
        };
        push_text(&mut out, &rest[..start], depth);

        let Some(end) = rest[start..].find('>') else {
            push_text(&mut out, &rest[start..], depth);
            break;
        };
        let tag = &rest[start..start + end + 1];
        let inner = tag[1..tag.len() - 1].trim();
        let is_closing = inner.starts_with('/');
        let name = inner
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let is_void = inner.ends_with('/') || VOID_TAGS.contains(&name.as_str());

        if is_closing {
            depth = depth.saturating_sub(1);
        }
        out.push(format!("{}{}", "  ".repeat(depth), tag));
        if !is_closing && !is_void && !name.is_empty() {
            depth += 1;
        }
        rest = &rest[start + end + 1..];
    }

    out.join("\n")
}

fn push_text(out: &mut Vec<String>, text: &str, depth: usize) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(format!("{}{}", "  ".repeat(depth), trimmed));
    }
}
