//! Mock construction helpers

use locale_sync::{LocaleId, TranslationEngine};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

mockall::mock! {
    pub Engine {}

    impl TranslationEngine for Engine {
        fn set_active_locale(&mut self, locale: LocaleId);
        fn active_locale(&self) -> LocaleId;
        fn translate(&self, key: &str) -> String;
    }
}

/// Engine that records every locale it is switched to
///
/// Clones share state, so a clone kept by the test sees the switches made
/// through the one moved into the binding.
#[derive(Debug, Default, Clone)]
pub struct RecordingEngine {
    active: Rc<Cell<Option<LocaleId>>>,
    history: Rc<RefCell<Vec<LocaleId>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the switch history
    pub fn history(&self) -> Rc<RefCell<Vec<LocaleId>>> {
        Rc::clone(&self.history)
    }
}

impl TranslationEngine for RecordingEngine {
    fn set_active_locale(&mut self, locale: LocaleId) {
        self.active.set(Some(locale));
        self.history.borrow_mut().push(locale);
    }

    fn active_locale(&self) -> LocaleId {
        self.active.get().expect("engine was never synchronized")
    }

    fn translate(&self, key: &str) -> String {
        format!("[{}] {}", self.active_locale(), key)
    }
}
