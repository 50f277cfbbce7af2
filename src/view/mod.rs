//! HTML presentation tree.
//!
//! Views are plain functions from state to markup. The page shows exactly
//! one of the loading, error, result and empty views, each tagged with a
//! `data-view` attribute.

pub mod page;
pub mod result;
pub mod skeleton;

pub use page::render_page;
pub use result::{render_result, Control, ResultView, Section, SECTIONS};
pub use skeleton::render_skeleton;

use crate::TextSnapshot;
use scraper::{Html, Selector};

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Extract the `<title>` and the visible body text of a rendered page.
///
/// Text of every element is concatenated in document order with runs of
/// whitespace collapsed to single spaces. `<style>` and `<script>` content
/// is skipped.
pub fn text_snapshot(html: &str) -> TextSnapshot {
    let document = Html::parse_document(html);
    let title_sel = Selector::parse("title").unwrap();
    let body_sel = Selector::parse("body").unwrap();

    let title = document
        .select(&title_sel)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();

    let mut parts = Vec::new();
    if let Some(body) = document.select(&body_sel).next() {
        for node in body.descendants() {
            if let Some(text) = node.value().as_text() {
                let inside_raw = node
                    .parent()
                    .and_then(|p| p.value().as_element())
                    .map(|e| matches!(e.name(), "style" | "script"))
                    .unwrap_or(false);
                if !inside_raw {
                    let content: &str = text;
                    parts.push(content.to_string());
                }
            }
        }
    }
    let text = parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    TextSnapshot {
        title: title.trim().to_string(),
        text,
    }
}
