use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DOCUMENT_TITLE: &str = "Tabs Output";
const DEFAULT_COPIED_INDICATOR_MS: u64 = 1200;
const DEFAULT_COPY_HOLD_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Heading and `<title>` of generated documents.
    pub document_title: String,
    /// How long the "copied" indicator stays up after a successful copy.
    pub copied_indicator_ms: u64,
    /// How long a one-shot `copy` keeps serving the clipboard before exiting
    /// (Linux only; 0 disables).
    pub copy_hold_ms: u64,
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            document_title: DEFAULT_DOCUMENT_TITLE.to_string(),
            copied_indicator_ms: DEFAULT_COPIED_INDICATOR_MS,
            copy_hold_ms: DEFAULT_COPY_HOLD_MS,
            data_dir: None,
        }
    }
}

impl AppConfig {
    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }

    pub fn copy_hold(&self) -> Duration {
        Duration::from_millis(self.copy_hold_ms)
    }

    /// Where the tab snapshot lives. `TABSMITH_DATA_HOME` wins over the file.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = std::env::var_os("TABSMITH_DATA_HOME") {
            return PathBuf::from(path);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        default_data_dir()
    }
}

pub fn load_config_from(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|e| {
        log::warn!("Ignoring invalid config {}: {}", path.display(), e);
        AppConfig::default()
    })
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).unwrap_or_default();
    std::fs::write(path, contents)
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TABSMITH_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("tabsmith").join("config.toml"),
        None => fallback_dir().join("config.toml"),
    }
}

fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("tabsmith"),
        None => fallback_dir(),
    }
}

fn fallback_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tabsmith")
}
