//! The persisted current locale
//!
//! [`LocaleStore`] is the single source of truth for the active locale. It
//! reads durable storage once when opened and writes it on every accepted
//! change, then notifies observers synchronously.
//!
//! # Invariants
//!
//! 1. `get()` always returns a supported [`LocaleId`].
//! 2. A failed `set` leaves the value, the version and storage untouched.
//! 3. Observers are notified in registration order, only when the value
//!    actually changes, and before `set` returns.
//! 4. One failing observer never prevents delivery to the others.
//! 5. An observer whose [`Subscription`] is dropped mid-notification, even by
//!    another observer, is not called again.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unsupported tag | `set_code("fr-FR")` | `InvalidLocale`, no change |
//! | Storage write fails | Disk full, permissions | `Storage` error, no change |
//! | Re-entrant set | Observer calls `set` | `ReentrantSet`, no change |
//! | Observer error/panic | Bug in a consumer | Logged, other observers still run |
//!
//! The store is single-threaded (`!Send`); the owning thread is the only
//! writer.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{LocaleError, Result};
use crate::locale::{LocaleId, DEFAULT_LOCALE};
use crate::storage::LocaleStorage;

type ObserverRc = Rc<dyn Fn(LocaleId) -> Result<()>>;
type ObserverWeak = Weak<dyn Fn(LocaleId) -> Result<()>>;

/// How a store finds and initializes its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Storage key
    pub key: String,
    /// Value used when storage is empty or invalid
    pub default_locale: LocaleId,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            default_locale: DEFAULT_LOCALE,
        }
    }
}

/// Persisted, observable current locale
pub struct LocaleStore {
    storage: RefCell<Box<dyn LocaleStorage>>,
    key: String,
    current: Cell<LocaleId>,
    version: Cell<u64>,
    notifying: Cell<bool>,
    observers: RefCell<Vec<ObserverWeak>>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("key", &self.key)
            .field("current", &self.current.get())
            .field("version", &self.version.get())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

impl LocaleStore {
    /// Open the store, reading the initial value from storage.
    ///
    /// An absent, unreadable or unsupported stored value is replaced by
    /// `options.default_locale`, which is written back. Only a failure of that
    /// write is returned.
    pub fn open(storage: impl LocaleStorage + 'static, options: &StoreOptions) -> Result<Self> {
        let mut storage: Box<dyn LocaleStorage> = Box::new(storage);

        let stored = match storage.read(&options.key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read stored locale, using default: {}", e);
                None
            }
        };

        let initial = match stored.as_deref().map(str::parse::<LocaleId>) {
            Some(Ok(locale)) => {
                tracing::debug!("Restored locale {} from storage", locale);
                locale
            }
            Some(Err(e)) => {
                tracing::warn!(
                    "Ignoring stored locale ({}), falling back to {}",
                    e,
                    options.default_locale
                );
                storage.write(&options.key, options.default_locale.code())?;
                options.default_locale
            }
            None => {
                tracing::debug!(
                    "No stored locale, initializing with {}",
                    options.default_locale
                );
                storage.write(&options.key, options.default_locale.code())?;
                options.default_locale
            }
        };

        Ok(Self {
            storage: RefCell::new(storage),
            key: options.key.clone(),
            current: Cell::new(initial),
            version: Cell::new(0),
            notifying: Cell::new(false),
            observers: RefCell::new(Vec::new()),
        })
    }

    /// Open with the default key and default locale
    pub fn open_default(storage: impl LocaleStorage + 'static) -> Result<Self> {
        Self::open(storage, &StoreOptions::default())
    }

    /// Current locale
    pub fn get(&self) -> LocaleId {
        self.current.get()
    }

    /// Number of accepted changes since the store was opened
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Persist `value` and notify observers if it differs from the current one
    pub fn set(&self, value: LocaleId) -> Result<()> {
        if self.notifying.get() {
            return Err(LocaleError::ReentrantSet(value));
        }

        self.storage.borrow_mut().write(&self.key, value.code())?;

        let previous = self.current.replace(value);
        if previous == value {
            tracing::trace!("Locale already {}, nothing to notify", value);
            return Ok(());
        }

        self.version.set(self.version.get() + 1);
        tracing::info!("Locale changed from {} to {}", previous, value);
        self.notify(value);
        Ok(())
    }

    /// Validate a locale tag and [`set`](Self::set) it
    pub fn set_code(&self, code: &str) -> Result<()> {
        let value = code.parse::<LocaleId>()?;
        self.set(value)
    }

    /// Register an observer.
    ///
    /// The observer is called once right away with the current value and
    /// then after every accepted change. It stays registered for as long as
    /// the returned [`Subscription`] is alive.
    pub fn subscribe(&self, observer: impl Fn(LocaleId) -> Result<()> + 'static) -> Subscription {
        let strong: ObserverRc = Rc::new(observer);
        self.observers.borrow_mut().push(Rc::downgrade(&strong));

        let current = self.get();
        let was_notifying = self.notifying.replace(true);
        deliver(&strong, current, 0);
        self.notifying.set(was_notifying);

        Subscription {
            _guard: Box::new(strong),
        }
    }

    fn notify(&self, value: LocaleId) {
        // Snapshot first so observers may subscribe without a borrow conflict
        let callbacks: Vec<ObserverWeak> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.clone()
        };

        let _guard = NotifyGuard::enter(&self.notifying);
        for (index, weak) in callbacks.iter().enumerate() {
            // Upgraded one at a time: a subscription dropped by an earlier
            // observer in this round is not called.
            if let Some(callback) = weak.upgrade() {
                deliver(&callback, value, index);
            }
        }
    }
}

/// Call one observer, reporting (not propagating) its failure
fn deliver(callback: &ObserverRc, value: LocaleId, index: usize) {
    match catch_unwind(AssertUnwindSafe(|| callback(value))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!("Locale observer #{} failed for {}: {}", index, value, e);
        }
        Err(_) => {
            tracing::error!("Locale observer #{} panicked for {}", index, value);
        }
    }
}

/// Marks the store as notifying until dropped
struct NotifyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Keeps an observer registered.
///
/// Dropping the subscription detaches the observer; the store prunes the
/// dead entry on its next notification.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Detach the observer now
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
