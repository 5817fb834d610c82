//! Durable key-value storage for the current locale
//!
//! The store reads its key once at startup and writes it on every accepted
//! change. Writes complete before returning so an immediate process exit cannot
//! lose an update.
//!
//! # Backends
//!
//! | Backend | Durability | Use |
//! |---------|-----------|-----|
//! | [`MemoryStorage`] | Process lifetime, shared between clones | Tests, embedding |
//! | [`JsonFileStorage`] | Survives restarts | Application default |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{LocaleError, Result};

/// Key-value persistence used by [`LocaleStore`](crate::store::LocaleStore)
pub trait LocaleStorage {
    /// Read a previously stored value, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: LocaleStorage + ?Sized> LocaleStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

// ==================== Memory Storage ====================

/// In-memory storage
///
/// Clones share the same map, so a clone kept aside can be handed to a fresh
/// store to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage holding one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().insert(key.into(), value.into());
        storage
    }

    /// Peek at a stored value
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl LocaleStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ==================== JSON File Storage ====================

/// One stored value with its last write time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// On-disk layout of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    /// Version for future migration support
    #[serde(default = "default_state_version")]
    pub version: u32,

    #[serde(default)]
    pub entries: HashMap<String, StoredEntry>,
}

fn default_state_version() -> u32 {
    1
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            version: 1,
            entries: HashMap::new(),
        }
    }
}

/// Storage backed by a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Use the state file at `path` (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document, `None` if the file does not exist
    pub fn load_document(&self) -> Result<Option<StateDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LocaleError::Storage(format!("Failed to read {:?}: {}", self.path, e))
        })?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| LocaleError::Storage(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    fn save_document(&self, document: &StateDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LocaleError::Storage(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| LocaleError::Storage(format!("Failed to serialize state: {}", e)))?;

        // Readers never observe a partially written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .map_err(|e| LocaleError::Storage(format!("Failed to write {:?}: {}", tmp, e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            LocaleError::Storage(format!("Failed to replace {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Saved locale state to {:?}", self.path);
        Ok(())
    }
}

impl LocaleStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .load_document()?
            .and_then(|mut doc| doc.entries.remove(key))
            .map(|entry| entry.value))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let mut document = match self.load_document() {
            Ok(doc) => doc.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Discarding unreadable locale state: {}", e);
                StateDocument::default()
            }
        };

        document.entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );

        self.save_document(&document)
    }
}
