//! Tab collection bound to durable storage.
//!
//! A [`TabStore`] restores the last snapshot once, then writes the full
//! snapshot back after every committed edit. Storage problems never block
//! editing: unreadable snapshots fall back to the default collection and
//! failed writes are only logged.

use anyhow::{Context, Result};

use crate::domain::{Tab, TabCollection, TabError};
use crate::infra::storage::Storage;

/// Key holding the JSON array of tabs.
pub const TABS_KEY: &str = "tabsData";
/// Key holding the active index as a decimal string.
pub const ACTIVE_INDEX_KEY: &str = "tabsActiveIndex";

pub struct TabStore<S: Storage> {
    storage: S,
    tabs: TabCollection,
}

impl<S: Storage> TabStore<S> {
    /// Restores the persisted snapshot, or starts from the default collection.
    ///
    /// This is the only constructor, so nothing can be written back before the
    /// stored snapshot has been read.
    pub fn load(storage: S) -> Self {
        let tabs = read_snapshot(&storage);
        Self { storage, tabs }
    }

    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_tab(&mut self) -> Result<&Tab, TabError> {
        self.tabs.add_tab()?;
        self.commit();
        Ok(self.tabs.active_tab())
    }

    pub fn remove_active(&mut self) -> Result<Tab, TabError> {
        let removed = self.tabs.remove_active()?;
        self.commit();
        Ok(removed)
    }

    pub fn rename_tab(&mut self, index: usize, title: impl Into<String>) -> Result<(), TabError> {
        self.tabs.rename(index, title)?;
        self.commit();
        Ok(())
    }

    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<(), TabError> {
        self.tabs.set_content(index, content)?;
        self.commit();
        Ok(())
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), TabError> {
        self.tabs.set_active(index)?;
        self.commit();
        Ok(())
    }

    /// Writes both snapshot keys.
    pub fn persist(&mut self) -> Result<()> {
        let json =
            serde_json::to_string(self.tabs.tabs()).context("Failed to serialize tabs")?;
        self.storage
            .save(TABS_KEY, &json)
            .context("Failed to save tabs")?;
        self.storage
            .save(ACTIVE_INDEX_KEY, &self.tabs.active_index().to_string())
            .context("Failed to save active tab index")?;
        Ok(())
    }

    /// Forgets the stored snapshot and reloads as on a cold start.
    pub fn reset(&mut self) {
        for key in [TABS_KEY, ACTIVE_INDEX_KEY] {
            if let Err(e) = self.storage.clear(key) {
                log::error!("Failed to clear '{}': {:#}", key, e);
            }
        }
        self.tabs = read_snapshot(&self.storage);
        log::info!("Tabs reset ({} tab(s) after reload)", self.tabs.len());
    }

    fn commit(&mut self) {
        if let Err(e) = self.persist() {
            log::error!("Keeping unsaved tab changes in memory: {:#}", e);
        }
    }
}

/// Reads and validates the stored snapshot, degrading to the default.
fn read_snapshot<S: Storage>(storage: &S) -> TabCollection {
    match try_read_snapshot(storage) {
        Ok(Some(tabs)) => {
            log::info!("Restored {} tab(s) from storage", tabs.len());
            tabs
        }
        Ok(None) => {
            log::debug!("No stored tabs, starting with defaults");
            TabCollection::default()
        }
        Err(e) => {
            log::warn!("Ignoring stored tabs: {:#}", e);
            TabCollection::default()
        }
    }
}

fn try_read_snapshot<S: Storage>(storage: &S) -> Result<Option<TabCollection>> {
    let Some(json) = storage.load(TABS_KEY).context("Failed to read tabs")? else {
        return Ok(None);
    };
    let tabs: Vec<Tab> = serde_json::from_str(&json).context("Stored tabs are malformed")?;
    let active = storage
        .load(ACTIVE_INDEX_KEY)
        .unwrap_or_else(|e| {
            log::warn!("Failed to read active tab index: {:#}", e);
            None
        })
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let count = tabs.len();
    TabCollection::from_parts(tabs, active)
        .map(Some)
        .with_context(|| format!("Stored tabs are not a valid collection ({count} entries)"))
}

#[cfg(test)]
mod tests;
