//! Standalone document generation.
//!
//! Turns an ordered list of tabs into one HTML file with inline styles and a
//! single inline script. Rendering is pure: the same tabs always produce the
//! same bytes.

pub mod encode;

use anyhow::Context;
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::display_title;
pub use encode::{TabContent, contents, embed_json};

/// Shown in the preview surface before anything has been generated.
pub const PREVIEW_PLACEHOLDER: &str = "<div style='padding:16px;font-family:system-ui'>Click <b>Generate HTML Code</b> to preview here.</div>";

/// Widget kinds a document can be generated for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    #[default]
    InteractiveTabs,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::InteractiveTabs => write!(f, "interactive-tabs"),
        }
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive-tabs" | "interactive tabs" | "tabs" => Ok(ComponentKind::InteractiveTabs),
            other => Err(format!("unknown component type '{other}'")),
        }
    }
}

static TEMPLATE_REGISTRY: Lazy<HashMap<ComponentKind, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        ComponentKind::InteractiveTabs,
        include_str!("tabs_document.hbs"),
    );
    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub component: ComponentKind,
    /// `<title>` and visible heading of the document.
    pub document_title: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            component: ComponentKind::default(),
            document_title: "Tabs Output".to_string(),
        }
    }
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    page_title: &'a str,
    data: String,
    tabs: Vec<TabView<'a>>,
}

/// Initial (first tab active) rendering of one tab.
#[derive(Serialize)]
struct TabView<'a> {
    label: String,
    content: &'a str,
    selected: bool,
    background: &'static str,
    color: &'static str,
    display: &'static str,
}

impl<'a> TabView<'a> {
    fn new(position: usize, tab: &TabContent<'a>) -> Self {
        let selected = position == 0;
        Self {
            label: display_title(tab.title, position),
            content: tab.content,
            selected,
            background: if selected { "#111" } else { "#fff" },
            color: if selected { "#fff" } else { "#111" },
            display: if selected { "block" } else { "none" },
        }
    }
}

/// Renders the default interactive tabs document.
pub fn generate(tabs: &[TabContent<'_>]) -> anyhow::Result<String> {
    render_document(tabs, &GeneratorOptions::default())
}

/// Renders a standalone document for `tabs`.
///
/// An empty slice yields a valid document whose widget has no buttons or
/// panels. Errors can only come from the template engine itself.
pub fn render_document(tabs: &[TabContent<'_>], options: &GeneratorOptions) -> anyhow::Result<String> {
    let template = TEMPLATE_REGISTRY
        .get(&options.component)
        .ok_or_else(|| anyhow::anyhow!("no template for component '{}'", options.component))?;

    let ctx = DocumentContext {
        page_title: &options.document_title,
        data: embed_json(tabs).context("serializing tab data")?,
        tabs: tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| TabView::new(i, tab))
            .collect(),
    };

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);

    hb.render_template(template, &ctx)
        .map_err(|e| anyhow::anyhow!("rendering {} document failed: {e}", options.component))
}
