//! Internationalization (i18n) support
//!
//! Provides the translation engine the binding keeps in sync with the store.
//!
//! The `i18n!` macro is initialized at the crate root (lib.rs); the bundled
//! tables live in `locales/`.

use crate::locale::LocaleId;

/// Maps string keys to text in the active locale
pub trait TranslationEngine {
    /// Switch the locale used by [`translate`](Self::translate)
    fn set_active_locale(&mut self, locale: LocaleId);

    /// Locale currently used for lookups
    fn active_locale(&self) -> LocaleId;

    /// Translate a key, returning the key itself when no table has it
    fn translate(&self, key: &str) -> String;
}

/// Engine backed by the process-wide `rust-i18n` locale
///
/// Setting the active locale also switches every `t!` call in the crate.
#[derive(Debug, Clone)]
pub struct RustI18nEngine {
    active: LocaleId,
}

impl RustI18nEngine {
    /// Create an engine and apply `initial` to `rust-i18n`
    pub fn new(initial: LocaleId) -> Self {
        rust_i18n::set_locale(initial.code());
        Self { active: initial }
    }

    /// Locales that have a bundled table
    pub fn bundled_locales() -> Vec<String> {
        rust_i18n::available_locales!()
            .into_iter()
            .map(|l| l.to_string())
            .collect()
    }
}

impl Default for RustI18nEngine {
    fn default() -> Self {
        Self::new(LocaleId::default())
    }
}

impl TranslationEngine for RustI18nEngine {
    fn set_active_locale(&mut self, locale: LocaleId) {
        tracing::debug!("Translation locale set to {}", locale);
        rust_i18n::set_locale(locale.code());
        self.active = locale;
    }

    fn active_locale(&self) -> LocaleId {
        self.active
    }

    fn translate(&self, key: &str) -> String {
        rust_i18n::t!(key, locale = self.active.code()).to_string()
    }
}

/// Get the locale `rust-i18n` is currently set to, if it is a supported one
pub fn global_locale() -> Option<LocaleId> {
    let locale = rust_i18n::locale();
    LocaleId::from_code(&locale)
}
