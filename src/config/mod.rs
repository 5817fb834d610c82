//! Configuration module for locale-sync
//!
//! This module handles:
//! - The application data directory
//! - The optional `locale.toml` configuration file
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.locale-sync/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.locale-sync/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.locale-sync\`
//!
//! # Files
//!
//! - `locale.toml` - Default locale, storage key, display name overrides
//! - `locale_state.json` - The persisted current locale
//!
//! # Example
//!
//! ```toml
//! default_locale = "en-US"
//! storage_key = "locale"
//!
//! [display_names]
//! "en-US" = "English (US)"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{LocaleError, Result};
use crate::locale::{DisplayNames, LocaleId, DEFAULT_LOCALE};
use crate::store::StoreOptions;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hxyulin.locale-sync";

/// Configuration filename
pub const CONFIG_FILE: &str = "locale.toml";

/// Persisted locale state filename
pub const LOCALE_STATE_FILE: &str = "locale_state.json";

/// Storage key the current locale is kept under
pub const DEFAULT_STORAGE_KEY: &str = "locale";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        LocaleError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            LocaleError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Locale Config ====================

/// Locale configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale used when storage is empty or holds an unsupported tag
    #[serde(default = "default_locale")]
    pub default_locale: LocaleId,

    /// Storage key for the current locale
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Override for the state file location
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Display name overrides for the language picker, keyed by locale tag
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
}

fn default_locale() -> LocaleId {
    DEFAULT_LOCALE
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            state_file: None,
            display_names: BTreeMap::new(),
        }
    }
}

impl LocaleConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LocaleError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            LocaleError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load locale config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LocaleError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| LocaleError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            LocaleError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Reject settings no store could work with
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(LocaleError::Config("storage_key must not be empty".to_string()));
        }
        for (tag, name) in &self.display_names {
            if LocaleId::from_code(tag).is_none() {
                return Err(LocaleError::Config(format!(
                    "display name given for unsupported locale {:?}",
                    tag
                )));
            }
            if name.trim().is_empty() {
                return Err(LocaleError::Config(format!(
                    "display name for {} must not be empty",
                    tag
                )));
            }
        }
        Ok(())
    }

    /// Options for opening a [`LocaleStore`](crate::store::LocaleStore)
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.storage_key.clone(),
            default_locale: self.default_locale,
        }
    }

    /// Native display names with this config's overrides applied
    pub fn display_names_table(&self) -> Result<DisplayNames> {
        let overrides = self
            .display_names
            .iter()
            .map(|(tag, name)| Ok((tag.parse::<LocaleId>()?, name.clone())))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(DisplayNames::native().with_overrides(&overrides))
    }

    /// Resolve where the locale state file lives
    pub fn resolve_state_file(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(ensure_app_data_dir()?.join(LOCALE_STATE_FILE)),
        }
    }
}

// ==================== Tests ====================
