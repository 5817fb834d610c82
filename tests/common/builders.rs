//! Test data builders for creating bindings

use locale_sync::{
    ComponentLocaleRegistry, DisplayNames, LocaleBinding, LocaleId, LocaleStorage, LocaleStore,
    MemoryStorage, StoreOptions,
};

use super::mock_helpers::RecordingEngine;

/// Builder for creating test bindings over in-memory storage
pub struct BindingBuilder {
    storage: MemoryStorage,
    options: StoreOptions,
    display_names: DisplayNames,
}

impl BindingBuilder {
    pub fn new() -> Self {
        Self {
            storage: MemoryStorage::new(),
            options: StoreOptions::default(),
            display_names: DisplayNames::native(),
        }
    }

    /// Reuse storage from an earlier "process"
    pub fn storage(mut self, storage: MemoryStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Pre-populate storage with a raw stored value
    pub fn stored(mut self, value: &str) -> Self {
        self.storage
            .write(&self.options.key, value)
            .expect("memory storage never fails");
        self
    }

    pub fn default_locale(mut self, locale: LocaleId) -> Self {
        self.options.default_locale = locale;
        self
    }

    pub fn display_names(mut self, names: DisplayNames) -> Self {
        self.display_names = names;
        self
    }

    pub fn build(self) -> (LocaleBinding<RecordingEngine>, RecordingEngine) {
        let engine = RecordingEngine::new();
        let handle = engine.clone();
        let store = LocaleStore::open(self.storage, &self.options).expect("open store");
        let binding = LocaleBinding::new(store, engine, ComponentLocaleRegistry::builtin())
            .expect("recording engine always synchronizes")
            .with_display_names(self.display_names);
        (binding, handle)
    }
}

impl Default for BindingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_builder() {
        let (binding, engine) = BindingBuilder::new().stored("en-US").build();
        assert_eq!(binding.current_locale(), LocaleId::EnUs);
        assert_eq!(*engine.history().borrow(), vec![LocaleId::EnUs]);
    }
}
