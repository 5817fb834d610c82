//! Locale binding
//!
//! [`LocaleBinding`] owns a [`LocaleStore`] and keeps a [`TranslationEngine`]
//! pointed at the store's value. On construction it subscribes to the store;
//! the initial notification and every later change set the engine's active
//! locale synchronously, inside the `set` call chain.
//!
//! The store isolates observer failures, so the binding checks the engine
//! again after every change it makes. An engine that could not be switched is
//! re-applied once; if it still disagrees with the store the change is
//! reported as [`LocaleError::InvariantViolation`] rather than `Ok`.
//!
//! The UI descriptor and the display name are looked up on demand from the
//! current locale, so they cannot go stale.

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::{LocaleError, Result};
use crate::i18n::TranslationEngine;
use crate::locale::{DisplayNames, LocaleId};
use crate::registry::{ComponentLocaleRegistry, UiLocaleDescriptor};
use crate::store::{LocaleStore, Subscription};

/// One entry in a language picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOption<'a> {
    pub locale: LocaleId,
    pub display_name: &'a str,
    pub is_current: bool,
}

/// Current locale plus everything derived from it
pub struct LocaleBinding<E, D = UiLocaleDescriptor> {
    store: LocaleStore,
    engine: Rc<RefCell<E>>,
    registry: ComponentLocaleRegistry<D>,
    display_names: DisplayNames,
    _sync: Subscription,
}

impl<E, D> std::fmt::Debug for LocaleBinding<E, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleBinding")
            .field("store", &self.store)
            .field("display_names", &self.display_names)
            .finish_non_exhaustive()
    }
}

impl<E: TranslationEngine + 'static, D> LocaleBinding<E, D> {
    /// Bind `engine` to `store`.
    ///
    /// The engine's active locale is set to the store's value before this
    /// returns. An engine that cannot take that locale is an
    /// `InvariantViolation`.
    pub fn new(
        store: LocaleStore,
        engine: E,
        registry: ComponentLocaleRegistry<D>,
    ) -> Result<Self> {
        let engine = Rc::new(RefCell::new(engine));

        let target = Rc::clone(&engine);
        let sync = store.subscribe(move |locale| {
            let mut engine = target.try_borrow_mut().map_err(|_| {
                LocaleError::Observer("translation engine is already borrowed".to_string())
            })?;
            engine.set_active_locale(locale);
            Ok(())
        });

        if !registry.is_total() {
            tracing::warn!(
                "Component locale registry has no descriptor for {:?}",
                registry.missing()
            );
        }

        let binding = Self {
            store,
            engine,
            registry,
            display_names: DisplayNames::native(),
            _sync: sync,
        };
        binding.ensure_synchronized()?;
        Ok(binding)
    }

    /// Replace the display name table
    pub fn with_display_names(mut self, display_names: DisplayNames) -> Self {
        if !display_names.is_total() {
            tracing::warn!("Display name table does not cover every locale");
        }
        self.display_names = display_names;
        self
    }

    /// The underlying store, for components that want their own subscription
    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Current locale
    pub fn current_locale(&self) -> LocaleId {
        self.store.get()
    }

    /// Component-library descriptor for the current locale
    pub fn ui_locale_descriptor(&self) -> Result<&D> {
        let locale = self.current_locale();
        self.registry.get(locale).ok_or_else(|| {
            LocaleError::InvariantViolation(format!(
                "no component locale descriptor registered for {}",
                locale
            ))
        })
    }

    /// Display name of the current locale
    pub fn display_name(&self) -> Result<&str> {
        self.display_name_of(self.current_locale())
    }

    /// Display name of any supported locale
    pub fn display_name_of(&self, locale: LocaleId) -> Result<&str> {
        self.display_names.get(locale).ok_or_else(|| {
            LocaleError::InvariantViolation(format!("no display name registered for {}", locale))
        })
    }

    /// Every selectable locale, in picker order
    pub fn available_locales(&self) -> &'static [LocaleId] {
        LocaleId::all()
    }

    /// Picker entries for every available locale
    pub fn locale_options(&self) -> Result<Vec<LocaleOption<'_>>> {
        let current = self.current_locale();
        self.available_locales()
            .iter()
            .map(|&locale| {
                Ok(LocaleOption {
                    locale,
                    display_name: self.display_name_of(locale)?,
                    is_current: locale == current,
                })
            })
            .collect()
    }

    /// Switch to `locale`
    pub fn set_locale(&self, locale: LocaleId) -> Result<()> {
        self.store.set(locale)?;
        self.ensure_synchronized()
    }

    /// Switch to the locale named by `code`, rejecting unsupported tags
    pub fn set_locale_code(&self, code: &str) -> Result<()> {
        self.store.set_code(code)?;
        self.ensure_synchronized()
    }

    /// Advance to the next locale in the cycle and return it
    pub fn cycle_locale(&self) -> Result<LocaleId> {
        let next = self.current_locale().next();
        self.set_locale(next)?;
        Ok(next)
    }

    /// Locale the translation engine is using
    pub fn translation_locale(&self) -> LocaleId {
        self.engine.borrow().active_locale()
    }

    /// Translate a key in the current locale
    pub fn translate(&self, key: &str) -> String {
        self.engine.borrow().translate(key)
    }

    /// Re-apply the store's locale if the sync observer left the engine behind
    fn ensure_synchronized(&self) -> Result<()> {
        let expected = self.current_locale();
        let actual = self.translation_locale();
        if actual == expected {
            return Ok(());
        }

        tracing::warn!(
            "Translation engine is on {} but the store is on {}, re-applying",
            actual,
            expected
        );
        let reapplied = catch_unwind(AssertUnwindSafe(|| {
            match self.engine.try_borrow_mut() {
                Ok(mut engine) => {
                    engine.set_active_locale(expected);
                    true
                }
                Err(_) => false,
            }
        }))
        .unwrap_or(false);

        if reapplied && self.translation_locale() == expected {
            return Ok(());
        }
        Err(LocaleError::InvariantViolation(format!(
            "translation engine could not be switched to {}",
            expected
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    /// Engine that records its switches and can be told to panic on one locale
    #[derive(Debug, Default)]
    struct TestEngine {
        active: LocaleId,
        history: Rc<RefCell<Vec<LocaleId>>>,
        fail_on: Option<LocaleId>,
        failures_left: u32,
    }

    impl TestEngine {
        fn failing_on(locale: LocaleId, times: u32) -> Self {
            Self {
                fail_on: Some(locale),
                failures_left: times,
                ..Self::default()
            }
        }
    }

    impl TranslationEngine for TestEngine {
        fn set_active_locale(&mut self, locale: LocaleId) {
            if self.fail_on == Some(locale) && self.failures_left > 0 {
                self.failures_left -= 1;
                panic!("no translation table for {}", locale);
            }
            self.active = locale;
            self.history.borrow_mut().push(locale);
        }

        fn active_locale(&self) -> LocaleId {
            self.active
        }

        fn translate(&self, key: &str) -> String {
            format!("{}:{}", self.active_locale(), key)
        }
    }

    fn binding_with(
        storage: MemoryStorage,
    ) -> (LocaleBinding<TestEngine>, Rc<RefCell<Vec<LocaleId>>>) {
        let engine = TestEngine::default();
        let history = Rc::clone(&engine.history);
        let store = LocaleStore::open_default(storage).unwrap();
        let binding =
            LocaleBinding::new(store, engine, ComponentLocaleRegistry::builtin()).unwrap();
        (binding, history)
    }

    #[test]
    fn test_engine_synchronized_at_construction() {
        let (binding, history) = binding_with(MemoryStorage::with_entry("locale", "zh-CN"));
        assert_eq!(binding.current_locale(), LocaleId::ZhCn);
        assert_eq!(binding.translation_locale(), LocaleId::ZhCn);
        assert_eq!(*history.borrow(), vec![LocaleId::ZhCn]);
    }

    #[test]
    fn test_set_locale_updates_every_derived_view() {
        let (binding, _) = binding_with(MemoryStorage::new());

        for &locale in binding.available_locales() {
            binding.set_locale(locale).unwrap();
            assert_eq!(binding.current_locale(), locale);
            assert_eq!(binding.translation_locale(), locale);
            assert_eq!(
                binding.ui_locale_descriptor().unwrap(),
                &UiLocaleDescriptor::for_locale(locale)
            );
            assert_eq!(binding.display_name().unwrap(), locale.native_name());
        }
    }

    #[test]
    fn test_repeated_set_notifies_engine_once() {
        let (binding, history) = binding_with(MemoryStorage::new());
        binding.set_locale(LocaleId::EnUs).unwrap();
        binding.set_locale(LocaleId::EnUs).unwrap();
        assert_eq!(*history.borrow(), vec![LocaleId::RuRu, LocaleId::EnUs]);
    }

    #[test]
    fn test_invalid_code_keeps_previous_locale() {
        let (binding, history) = binding_with(MemoryStorage::new());
        binding.set_locale(LocaleId::EnUs).unwrap();

        let err = binding.set_locale_code("fr-FR").unwrap_err();
        assert!(err.is_invalid_locale());
        assert_eq!(binding.current_locale(), LocaleId::EnUs);
        assert_eq!(binding.translation_locale(), LocaleId::EnUs);
        assert_eq!(history.borrow().len(), 2);
    }

    #[test]
    fn test_cycle_returns_to_start() {
        let (binding, _) = binding_with(MemoryStorage::new());
        let start = binding.current_locale();
        let mut visited = Vec::new();
        for _ in 0..binding.available_locales().len() {
            visited.push(binding.cycle_locale().unwrap());
        }
        assert_eq!(binding.current_locale(), start);
        visited.sort();
        assert_eq!(visited, LocaleId::ALL.to_vec());
    }

    #[test]
    fn test_missing_descriptor_is_invariant_violation() {
        let store =
            LocaleStore::open_default(MemoryStorage::with_entry("locale", "en-US")).unwrap();
        let registry = ComponentLocaleRegistry::from_entries([(LocaleId::ZhCn, "zh")]);
        let binding = LocaleBinding::new(store, TestEngine::default(), registry).unwrap();

        let err = binding.ui_locale_descriptor().unwrap_err();
        assert!(matches!(err, LocaleError::InvariantViolation(_)));
        assert!(err.is_fatal());

        binding.set_locale(LocaleId::ZhCn).unwrap();
        assert_eq!(binding.ui_locale_descriptor().unwrap(), &"zh");
    }

    #[test]
    fn test_missing_display_name_is_invariant_violation() {
        let (binding, _) = binding_with(MemoryStorage::new());
        let binding = binding.with_display_names(DisplayNames::from_entries([(
            LocaleId::EnUs,
            "English".to_string(),
        )]));

        assert!(binding.display_name().unwrap_err().is_fatal());
        assert!(binding.locale_options().is_err());
        binding.set_locale(LocaleId::EnUs).unwrap();
        assert_eq!(binding.display_name().unwrap(), "English");
    }

    #[test]
    fn test_locale_options_mark_current() {
        let (binding, _) = binding_with(MemoryStorage::new());
        binding.set_locale(LocaleId::EnUs).unwrap();

        let options = binding.locale_options().unwrap();
        let names: Vec<_> = options.iter().map(|o| o.display_name).collect();
        assert_eq!(names, vec!["简体中文", "English", "Русский"]);
        let current: Vec<_> = options
            .iter()
            .filter(|o| o.is_current)
            .map(|o| o.locale)
            .collect();
        assert_eq!(current, vec![LocaleId::EnUs]);
    }

    #[test]
    fn test_translate_goes_through_engine() {
        let (binding, _) = binding_with(MemoryStorage::new());
        binding.set_locale(LocaleId::ZhCn).unwrap();
        assert_eq!(binding.translate("language.title"), "zh-CN:language.title");
    }

    #[test]
    fn test_extra_store_observers_see_binding_changes() {
        let (binding, _) = binding_with(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = binding.store().subscribe(move |locale| {
            sink.borrow_mut().push(locale);
            Ok(())
        });

        binding.cycle_locale().unwrap();
        assert_eq!(*seen.borrow(), vec![LocaleId::RuRu, LocaleId::ZhCn]);
    }

    fn binding_over(
        storage: MemoryStorage,
        engine: TestEngine,
    ) -> Result<LocaleBinding<TestEngine>> {
        let store = LocaleStore::open_default(storage).unwrap();
        LocaleBinding::new(store, engine, ComponentLocaleRegistry::builtin())
    }

    #[test]
    fn test_engine_failure_is_not_reported_as_success() {
        let engine = TestEngine::failing_on(LocaleId::EnUs, u32::MAX);
        let binding = binding_over(MemoryStorage::new(), engine).unwrap();

        let err = binding.set_locale(LocaleId::EnUs).unwrap_err();
        assert!(matches!(err, LocaleError::InvariantViolation(_)));
        assert!(err.is_fatal());
        assert_eq!(binding.translation_locale(), LocaleId::RuRu);

        assert!(binding.set_locale_code("en-US").unwrap_err().is_fatal());
        // Leaving the broken locale brings both sides back together
        assert_eq!(binding.cycle_locale().unwrap(), LocaleId::RuRu);
        assert_eq!(binding.translation_locale(), LocaleId::RuRu);
    }

    #[test]
    fn test_engine_failure_is_repaired_when_retry_succeeds() {
        let engine = TestEngine::failing_on(LocaleId::EnUs, 1);
        let binding = binding_over(MemoryStorage::new(), engine).unwrap();

        binding.set_locale(LocaleId::EnUs).unwrap();
        assert_eq!(binding.current_locale(), LocaleId::EnUs);
        assert_eq!(binding.translation_locale(), LocaleId::EnUs);
    }

    #[test]
    fn test_engine_failure_at_construction_is_an_error() {
        let storage = MemoryStorage::with_entry("locale", "zh-CN");
        let engine = TestEngine::failing_on(LocaleId::ZhCn, u32::MAX);
        let err = binding_over(storage, engine).unwrap_err();
        assert!(err.is_fatal());
    }
}
