use serde::{Deserialize, Serialize};

use super::error::TabError;

/// Upper bound on the number of tabs a collection may hold.
pub const MAX_TABS: usize = 15;

/// Lower bound on the number of tabs a collection may hold.
pub const MIN_TABS: usize = 1;

/// One titled content panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: u64,
    pub title: String,
    pub content: String,
}

impl Tab {
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Title shown for this tab at `position` (0-based).
    ///
    /// Blank titles are never written back; the fallback only exists on screen
    /// and in generated output.
    pub fn display_title(&self, position: usize) -> String {
        display_title(&self.title, position)
    }
}

/// Positional fallback for blank titles: `"Tab N"`, 1-based.
pub fn display_title(title: &str, position: usize) -> String {
    if is_blank(title) {
        fallback_title(position)
    } else {
        title.to_string()
    }
}

/// Blank by the rule the generated script applies (JavaScript `trim`): Unicode
/// white space except U+0085, plus the byte order mark U+FEFF.
pub fn is_blank(title: &str) -> bool {
    title
        .chars()
        .all(|c| c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}'))
}

pub fn fallback_title(position: usize) -> String {
    format!("Tab {}", position + 1)
}

/// Ordered tabs plus the active position.
///
/// Holds between [`MIN_TABS`] and [`MAX_TABS`] tabs with unique ids, and an
/// active index that always points at one of them. Every mutation that would
/// break one of those rules is rejected without touching the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabCollection {
    tabs: Vec<Tab>,
    active: usize,
}

impl Default for TabCollection {
    fn default() -> Self {
        Self {
            tabs: vec![Tab::new(1, fallback_title(0), "")],
            active: 0,
        }
    }
}

impl TabCollection {
    /// Builds a collection from restored tabs.
    ///
    /// Returns `None` when the tabs cannot form a valid collection (empty,
    /// over capacity, or duplicate ids). The active index is clamped.
    pub fn from_parts(tabs: Vec<Tab>, active: usize) -> Option<Self> {
        if tabs.len() < MIN_TABS || tabs.len() > MAX_TABS {
            return None;
        }
        let mut ids: Vec<u64> = tabs.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != tabs.len() {
            return None;
        }
        let active = active.min(tabs.len() - 1);
        Some(Self { tabs, active })
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    fn next_id(&self) -> Option<u64> {
        self.tabs.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
    }

    /// Appends a fresh tab and makes it active.
    pub fn add_tab(&mut self) -> Result<&Tab, TabError> {
        if self.tabs.len() >= MAX_TABS {
            return Err(TabError::TooManyTabs { max: MAX_TABS });
        }
        let id = self.next_id().ok_or(TabError::IdsExhausted)?;
        let title = fallback_title(self.tabs.len());
        self.tabs.push(Tab::new(id, title, ""));
        self.active = self.tabs.len() - 1;
        Ok(&self.tabs[self.active])
    }

    /// Removes the active tab; the tab before it becomes active.
    pub fn remove_active(&mut self) -> Result<Tab, TabError> {
        if self.tabs.len() <= MIN_TABS {
            return Err(TabError::LastTab);
        }
        let removed = self.tabs.remove(self.active);
        self.active = self.active.saturating_sub(1).min(self.tabs.len() - 1);
        Ok(removed)
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> Result<(), TabError> {
        let tab = self.tab_mut(index)?;
        tab.title = title.into();
        Ok(())
    }

    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<(), TabError> {
        let tab = self.tab_mut(index)?;
        tab.content = content.into();
        Ok(())
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), TabError> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    fn tab_mut(&mut self, index: usize) -> Result<&mut Tab, TabError> {
        self.check_index(index)?;
        Ok(&mut self.tabs[index])
    }

    fn check_index(&self, index: usize) -> Result<(), TabError> {
        if index < self.tabs.len() {
            Ok(())
        } else {
            Err(TabError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            })
        }
    }
}
