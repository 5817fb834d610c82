//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use locale_sync::{LocaleBinding, LocaleId, TranslationEngine};

/// Assert the binding and its engine agree on `expected`
pub fn assert_synchronized<E: TranslationEngine + 'static>(
    binding: &LocaleBinding<E>,
    expected: LocaleId,
) {
    assert_eq!(binding.current_locale(), expected, "store locale");
    assert_eq!(binding.translation_locale(), expected, "engine locale");
    assert_eq!(
        binding.store().get(),
        expected,
        "store read through accessor"
    );
}
