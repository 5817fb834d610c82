//! Supported locales
//!
//! The set of locales is closed: every value of [`LocaleId`] is supported and
//! nothing else is. Tags coming from storage, configuration or user input are
//! parsed with [`LocaleId::from_code`] / [`str::parse`] and rejected with
//! [`LocaleError::InvalidLocale`] when they are not one of the members.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{LocaleError, Result};

/// Locale used when storage holds nothing usable
pub const DEFAULT_LOCALE: LocaleId = LocaleId::RuRu;

/// Supported display locales
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LocaleId {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "ru-RU")]
    RuRu,
}

impl LocaleId {
    /// All supported locales, in picker order
    pub const ALL: [LocaleId; 3] = [LocaleId::ZhCn, LocaleId::EnUs, LocaleId::RuRu];

    /// Get the locale tag for this locale
    pub fn code(&self) -> &'static str {
        match self {
            LocaleId::ZhCn => "zh-CN",
            LocaleId::EnUs => "en-US",
            LocaleId::RuRu => "ru-RU",
        }
    }

    /// Get the native display name (in its own script)
    pub fn native_name(&self) -> &'static str {
        match self {
            LocaleId::ZhCn => "简体中文",
            LocaleId::EnUs => "English",
            LocaleId::RuRu => "Русский",
        }
    }

    /// Get all available locales
    pub fn all() -> &'static [LocaleId] {
        &Self::ALL
    }

    /// Parse a locale from its tag
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "zh-CN" => Some(LocaleId::ZhCn),
            "en-US" => Some(LocaleId::EnUs),
            "ru-RU" => Some(LocaleId::RuRu),
            _ => None,
        }
    }

    /// Next locale in the switching cycle (zh-CN → en-US → ru-RU → zh-CN)
    pub fn next(&self) -> Self {
        match self {
            LocaleId::ZhCn => LocaleId::EnUs,
            LocaleId::EnUs => LocaleId::RuRu,
            LocaleId::RuRu => LocaleId::ZhCn,
        }
    }
}

impl Default for LocaleId {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LocaleId {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| LocaleError::InvalidLocale(s.to_string()))
    }
}

// ==================== Display Names ====================

/// Human-readable names for the language picker
///
/// Starts from the native names and lets configuration override single
/// entries. Lookups return `None` for a locale with no entry, which callers
/// treat as an invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNames {
    names: BTreeMap<LocaleId, String>,
}

impl DisplayNames {
    /// Native names for every supported locale
    pub fn native() -> Self {
        Self {
            names: LocaleId::ALL
                .iter()
                .map(|id| (*id, id.native_name().to_string()))
                .collect(),
        }
    }

    /// Build a table from explicit entries only (may be partial)
    pub fn from_entries(entries: impl IntoIterator<Item = (LocaleId, String)>) -> Self {
        Self {
            names: entries.into_iter().collect(),
        }
    }

    /// Replace the name for one locale
    pub fn with_name(mut self, locale: LocaleId, name: impl Into<String>) -> Self {
        self.names.insert(locale, name.into());
        self
    }

    /// Apply a set of overrides on top of the current names
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a LocaleId, &'a String)>,
    ) -> Self {
        for (locale, name) in overrides {
            self.names.insert(*locale, name.clone());
        }
        self
    }

    /// Look up the name for a locale
    pub fn get(&self, locale: LocaleId) -> Option<&str> {
        self.names.get(&locale).map(String::as_str)
    }

    /// Whether every supported locale has a name
    pub fn is_total(&self) -> bool {
        LocaleId::ALL.iter().all(|id| self.names.contains_key(id))
    }
}

impl Default for DisplayNames {
    fn default() -> Self {
        Self::native()
    }
}
