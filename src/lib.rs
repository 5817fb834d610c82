//! # locale-sync: persisted display-language setting
//!
//! Keeps one user-selected display locale in sync between three places:
//! durable storage, the translation engine, and the locale descriptor a UI
//! component library consumes.
//!
//! ## Architecture
//!
//! - **Store**: [`LocaleStore`] holds the current locale, persists it and
//!   notifies observers synchronously
//! - **Binding**: [`LocaleBinding`] subscribes to the store, keeps the
//!   [`TranslationEngine`] on the same locale and derives the UI descriptor
//!   and display name
//! - **Storage**: [`LocaleStorage`] backends (in-memory, JSON file)
//! - **Configuration**: [`LocaleConfig`] in `locale.toml`
//!
//! ## Supported Locales
//!
//! `zh-CN`, `en-US` and `ru-RU`. The default is `ru-RU` unless configured
//! otherwise.
//!
//! ## Example
//!
//! ```no_run
//! use locale_sync::{
//!     ComponentLocaleRegistry, JsonFileStorage, LocaleBinding, LocaleConfig, LocaleStore,
//!     RustI18nEngine,
//! };
//!
//! fn main() -> locale_sync::Result<()> {
//!     let config = LocaleConfig::load_or_default();
//!     let storage = JsonFileStorage::new(config.resolve_state_file()?);
//!     let store = LocaleStore::open(storage, &config.store_options())?;
//!
//!     let binding = LocaleBinding::new(
//!         store,
//!         RustI18nEngine::default(),
//!         ComponentLocaleRegistry::builtin(),
//!     )?
//!     .with_display_names(config.display_names_table()?);
//!
//!     binding.cycle_locale()?;
//!     println!("{}", binding.display_name()?);
//!     Ok(())
//! }
//! ```

// Translation tables for `t!` / `RustI18nEngine`
rust_i18n::i18n!("locales", fallback = "ru-RU");

pub mod binding;
pub mod config;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod registry;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use binding::{LocaleBinding, LocaleOption};
pub use config::LocaleConfig;
pub use error::{LocaleError, Result};
pub use i18n::{RustI18nEngine, TranslationEngine};
pub use locale::{DisplayNames, LocaleId, DEFAULT_LOCALE};
pub use registry::{ComponentLocaleRegistry, UiLocaleDescriptor};
pub use storage::{JsonFileStorage, LocaleStorage, MemoryStorage};
pub use store::{LocaleStore, StoreOptions, Subscription};
