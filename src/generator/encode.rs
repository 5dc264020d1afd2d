//! Embedding of tab data into the generated script.
//!
//! The data literal is JSON, which is also a valid JavaScript expression. On
//! top of the standard JSON escaping, every character that could end the
//! surrounding `<script>` element or start markup (`<`, `>`, `&`) and the two
//! characters JavaScript treats as line terminators inside string literals
//! (U+2028, U+2029) are written as `\uXXXX` escapes. Those escapes decode to
//! the same characters, so the widget reads back exactly what was written.

use serde::Serialize;

use crate::domain::Tab;

/// Title and content of one tab as it appears in the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabContent<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

impl<'a> TabContent<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self { title, content }
    }
}

impl<'a> From<&'a Tab> for TabContent<'a> {
    fn from(tab: &'a Tab) -> Self {
        Self::new(&tab.title, &tab.content)
    }
}

/// Borrowed title/content pairs for a slice of tabs, in order.
pub fn contents(tabs: &[Tab]) -> Vec<TabContent<'_>> {
    tabs.iter().map(TabContent::from).collect()
}

/// Serializes `tabs` into a literal that is safe to place inside `<script>`.
pub fn embed_json(tabs: &[TabContent<'_>]) -> serde_json::Result<String> {
    let json = serde_json::to_string(tabs)?;
    Ok(escape_script_json(&json))
}

/// Rewrites markup-significant characters and JS line terminators in
/// serialized JSON as `\uXXXX` escapes.
///
/// Only valid for JSON text: the replaced characters can only occur inside
/// string literals there, where the escape form is equivalent.
pub fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}
