//! Error handling for locale-sync
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate.

use thiserror::Error;

use crate::locale::LocaleId;

/// Main error type for locale-sync operations
#[derive(Error, Debug)]
pub enum LocaleError {
    /// A locale tag that is not one of the supported locales
    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),

    /// A lookup table has no entry for a locale the store accepted.
    ///
    /// This is a configuration bug, never a user condition.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A locale change was requested while observers were being notified
    #[error("Re-entrant locale change to {0} during observer notification")]
    ReentrantSet(LocaleId),

    /// Errors related to durable storage
    #[error("Storage error: {0}")]
    Storage(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors returned by a change observer
    #[error("Observer error: {0}")]
    Observer(String),
}

impl LocaleError {
    /// Whether this error indicates a defect rather than a recoverable condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, LocaleError::InvariantViolation(_))
    }

    /// Whether this error is an invalid locale tag
    pub fn is_invalid_locale(&self) -> bool {
        matches!(self, LocaleError::InvalidLocale(_))
    }
}

/// Result type alias for locale-sync operations
pub type Result<T> = std::result::Result<T, LocaleError>;
