//! Editor session: user actions in, tab state and generated documents out.
//!
//! Every edit goes straight to the [`TabStore`] (and therefore to storage).
//! Generation only happens on an explicit `generate` or `copy`.

use std::fmt;
use std::time::{Duration, Instant};

use crate::application::tabs::TabStore;
use crate::domain::{TabCollection, TabError};
use crate::generator::{self, ComponentKind, GeneratorOptions, PREVIEW_PLACEHOLDER};
use crate::infra::app_config::AppConfig;
use crate::infra::clipboard::ClipboardSink;
use crate::infra::storage::Storage;

pub const COPY_FAILED_NOTICE: &str =
    "Copy failed. Scroll down to the 'Generated HTML' box and copy manually.";

/// A rejected action, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<TabError> for Notice {
    fn from(err: TabError) -> Self {
        Notice::new(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(Notice),
}

pub struct Editor<S: Storage, C: ClipboardSink> {
    store: TabStore<S>,
    clipboard: C,
    options: GeneratorOptions,
    copied_for: Duration,
    preview: Option<String>,
    copied_until: Option<Instant>,
}

impl<S: Storage, C: ClipboardSink> Editor<S, C> {
    pub fn new(store: TabStore<S>, clipboard: C) -> Self {
        Self::with_config(store, clipboard, &AppConfig::default())
    }

    pub fn with_config(store: TabStore<S>, clipboard: C, config: &AppConfig) -> Self {
        Self {
            store,
            clipboard,
            options: GeneratorOptions {
                document_title: config.document_title.clone(),
                ..Default::default()
            },
            copied_for: config.copied_indicator(),
            preview: None,
            copied_until: None,
        }
    }

    pub fn tabs(&self) -> &TabCollection {
        self.store.tabs()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Labels as shown in the tab strip, blank titles replaced by position.
    pub fn tab_labels(&self) -> Vec<String> {
        self.tabs()
            .tabs()
            .iter()
            .enumerate()
            .map(|(i, tab)| tab.display_title(i))
            .collect()
    }

    pub fn add_tab(&mut self) -> Result<(), Notice> {
        let tab = self.store.add_tab()?;
        log::debug!("Added tab {}", tab.id);
        Ok(())
    }

    pub fn remove_active(&mut self) -> Result<(), Notice> {
        let tab = self.store.remove_active()?;
        log::debug!("Removed tab {}", tab.id);
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Result<(), Notice> {
        Ok(self.store.set_active(index)?)
    }

    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> Result<(), Notice> {
        Ok(self.store.rename_tab(index, title)?)
    }

    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<(), Notice> {
        Ok(self.store.set_content(index, content)?)
    }

    pub fn rename_active(&mut self, title: impl Into<String>) -> Result<(), Notice> {
        let index = self.tabs().active_index();
        self.set_title(index, title)
    }

    pub fn set_active_content(&mut self, content: impl Into<String>) -> Result<(), Notice> {
        let index = self.tabs().active_index();
        self.set_content(index, content)
    }

    pub fn set_component(&mut self, component: ComponentKind) {
        self.options.component = component;
    }

    /// Renders the current tabs into the preview buffer.
    pub fn generate(&mut self) -> anyhow::Result<&str> {
        let html = self.render()?;
        Ok(self.preview.insert(html).as_str())
    }

    /// The last generated document, if any.
    pub fn last_generated(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// What the preview surface should display.
    pub fn preview(&self) -> &str {
        self.last_generated().unwrap_or(PREVIEW_PLACEHOLDER)
    }

    /// Sends the last generated document (or a fresh one) to the clipboard.
    pub fn copy(&mut self, now: Instant) -> CopyOutcome {
        let html = match &self.preview {
            Some(html) => html.clone(),
            None => match self.render() {
                Ok(html) => html,
                Err(e) => {
                    log::error!("Failed to generate document for copy: {:#}", e);
                    self.copied_until = None;
                    return CopyOutcome::Failed(Notice::new(COPY_FAILED_NOTICE));
                }
            },
        };

        match self.clipboard.set_text(&html) {
            Ok(()) => {
                self.copied_until = Some(now + self.copied_for);
                CopyOutcome::Copied
            }
            Err(e) => {
                log::warn!("Copy to clipboard failed: {:#}", e);
                self.copied_until = None;
                CopyOutcome::Failed(Notice::new(COPY_FAILED_NOTICE))
            }
        }
    }

    /// Whether the transient "copied" indicator is still up at `now`.
    pub fn copied_indicator_visible(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    /// Clears stored tabs and starts over as on a cold start.
    pub fn reset(&mut self) {
        self.store.reset();
        self.preview = None;
        self.copied_until = None;
    }

    /// Renders the current tabs without touching the preview buffer.
    pub fn render(&self) -> anyhow::Result<String> {
        let tabs = generator::contents(self.tabs().tabs());
        generator::render_document(&tabs, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_TABS;
    use crate::infra::storage::MemoryStore;

    #[derive(Default)]
    struct FakeClipboard {
        copied: Vec<String>,
        fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard");
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    fn editor() -> Editor<MemoryStore, FakeClipboard> {
        Editor::new(TabStore::load(MemoryStore::new()), FakeClipboard::default())
    }

    #[test]
    fn test_capacity_notices() {
        let mut editor = editor();
        assert_eq!(
            editor.remove_active().unwrap_err().message,
            "Keep at least one tab."
        );
        for _ in 1..MAX_TABS {
            editor.add_tab().unwrap();
        }
        assert_eq!(
            editor.add_tab().unwrap_err().message,
            "You can make up to 15 tabs only."
        );
        assert_eq!(editor.tabs().len(), MAX_TABS);
    }

    #[test]
    fn test_labels_use_fallback() {
        let mut editor = editor();
        editor.rename_active("Intro").unwrap();
        editor.add_tab().unwrap();
        editor.rename_active("  ").unwrap();
        assert_eq!(editor.tab_labels(), vec!["Intro", "Tab 2"]);
        assert_eq!(editor.tabs().active_tab().title, "  ");
    }

    #[test]
    fn test_preview_placeholder_until_generate() {
        let mut editor = editor();
        assert_eq!(editor.preview(), PREVIEW_PLACEHOLDER);
        assert!(editor.last_generated().is_none());

        editor.set_active_content("Hello").unwrap();
        let html = editor.generate().unwrap().to_string();
        assert!(html.contains(">Hello</div>"));
        assert_eq!(editor.preview(), html);
    }

    #[test]
    fn test_edits_do_not_regenerate() {
        let mut editor = editor();
        editor.set_active_content("before").unwrap();
        editor.generate().unwrap();
        editor.set_active_content("after").unwrap();
        assert!(editor.preview().contains(">before</div>"));
    }

    #[test]
    fn test_copy_uses_last_generated() {
        let mut editor = editor();
        editor.set_active_content("first").unwrap();
        let generated = editor.generate().unwrap().to_string();
        editor.set_active_content("second").unwrap();

        assert_eq!(editor.copy(Instant::now()), CopyOutcome::Copied);
        assert_eq!(editor.clipboard().copied, vec![generated]);
    }

    #[test]
    fn test_copy_without_generate_renders_fresh() {
        let mut editor = editor();
        editor.set_active_content("fresh").unwrap();
        assert_eq!(editor.copy(Instant::now()), CopyOutcome::Copied);
        assert!(editor.clipboard().copied[0].contains(">fresh</div>"));
        assert!(editor.last_generated().is_none());
    }

    #[test]
    fn test_copied_indicator_reverts() {
        let mut editor = editor();
        let now = Instant::now();
        assert!(!editor.copied_indicator_visible(now));

        editor.copy(now);
        assert!(editor.copied_indicator_visible(now));
        assert!(editor.copied_indicator_visible(now + Duration::from_millis(1199)));
        assert!(!editor.copied_indicator_visible(now + Duration::from_millis(1200)));
    }

    #[test]
    fn test_copy_failure_reports_notice() {
        let mut editor = Editor::new(
            TabStore::load(MemoryStore::new()),
            FakeClipboard {
                fail: true,
                ..Default::default()
            },
        );
        let now = Instant::now();
        assert_eq!(
            editor.copy(now),
            CopyOutcome::Failed(Notice::new(COPY_FAILED_NOTICE))
        );
        assert!(!editor.copied_indicator_visible(now));
        assert_eq!(editor.tabs().len(), 1);
    }

    #[test]
    fn test_config_title_and_delay() {
        let config = AppConfig {
            document_title: "Unit 4".into(),
            copied_indicator_ms: 10,
            data_dir: None,
            ..Default::default()
        };
        let mut editor = Editor::with_config(
            TabStore::load(MemoryStore::new()),
            FakeClipboard::default(),
            &config,
        );
        assert!(editor.generate().unwrap().contains("<title>Unit 4</title>"));

        let now = Instant::now();
        editor.copy(now);
        assert!(!editor.copied_indicator_visible(now + Duration::from_millis(10)));
    }

    #[test]
    fn test_reset_drops_preview_and_tabs() {
        let mut editor = editor();
        editor.add_tab().unwrap();
        editor.generate().unwrap();
        editor.reset();
        assert_eq!(editor.tabs(), &TabCollection::default());
        assert_eq!(editor.preview(), PREVIEW_PLACEHOLDER);
    }

    #[test]
    fn test_out_of_range_select_is_notice() {
        let mut editor = editor();
        let notice = editor.select(3).unwrap_err();
        assert!(notice.message.contains("out of range"));
        assert_eq!(editor.tabs().active_index(), 0);
    }
}
