//! Durable key-value storage for the tab snapshot.
//!
//! The rest of the crate only talks to the [`Storage`] trait, so the backing
//! mechanism can be swapped (on-disk JSON file in the binary, plain map in
//! tests).

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILENAME: &str = "store.json";

/// String key-value store that survives across sessions.
pub trait Storage {
    /// Reads a key. A missing key is `Ok(None)`, not an error.
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes a key. Removing a missing key succeeds.
    fn clear(&mut self, key: &str) -> Result<()>;
}

/// In-process store. Nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file under a data directory.
///
/// Every write rewrites the whole file: tmp file first, then rename, so a
/// crash never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store file inside `data_dir`. The directory is created on first write.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORE_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse store file {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).context("Failed to write store file")?;
        fs::rename(&tmp_path, &self.path).context("Failed to replace store file")?;
        Ok(())
    }

    /// Current entries, or an empty map when the file is unreadable. A write
    /// must not be blocked by a corrupt file it is about to replace.
    fn entries_for_write(&self) -> BTreeMap<String, String> {
        self.read_all().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable store contents: {:#}", e);
            BTreeMap::new()
        })
    }
}

impl Storage for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries_for_write();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.entries_for_write();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
