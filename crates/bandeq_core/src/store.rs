//! Settings Storage
//!
//! A string-keyed store the controller mirrors its state into.
//!
//! # Storage Locations
//! - Linux: `~/.config/bandeq/settings.json`
//! - Windows: `%APPDATA%\bandeq\settings.json`
//! - macOS: `~/Library/Application Support/bandeq/settings.json`

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};

/// Trait for the key-value collaborator that holds persisted settings
pub trait SettingsStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> CoreResult<()>;
}

/// Volatile store, used by tests and sessions that should not touch disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object of string values on disk
///
/// Every changed `set` replaces the whole file atomically.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A file that cannot be parsed is
    /// logged and treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str(&contents) {
                Ok(values) => {
                    info!("Settings loaded from {:?}", path);
                    values
                }
                Err(e) => {
                    warn!("Failed to parse settings file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            debug!("No settings file at {:?}, starting empty", path);
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    /// Open the store at the platform-specific default location
    pub fn open_default() -> CoreResult<Self> {
        Self::open(Self::default_path().ok_or(CoreError::NoSettingsPath)?)
    }

    /// Get the platform-specific settings file path
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bandeq", "bandeq")
            .map(|proj| proj.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn flush(&self) -> CoreResult<()> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Rename is atomic; readers see the old file or the new one
        let staging = self.staging_path();
        let file = fs::File::create(&staging)?;
        serde_json::to_writer_pretty(&file, &self.values)?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;

        debug!("Settings saved to {:?}", self.path);
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
