//! UI component locale descriptors
//!
//! A [`ComponentLocaleRegistry`] maps every [`LocaleId`] to the descriptor a
//! UI component library consumes (date formats, pagination labels and so on).
//! The binding only reads from it; the descriptor type is opaque to the rest
//! of the crate.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::locale::LocaleId;

/// Mapping from locale to component-library descriptor
#[derive(Debug, Clone)]
pub struct ComponentLocaleRegistry<D> {
    entries: HashMap<LocaleId, D>,
}

impl<D> ComponentLocaleRegistry<D> {
    /// Build a registry with one descriptor per supported locale
    pub fn from_fn(mut f: impl FnMut(LocaleId) -> D) -> Self {
        Self {
            entries: LocaleId::ALL.iter().map(|id| (*id, f(*id))).collect(),
        }
    }

    /// Build a registry from explicit entries (may be partial)
    pub fn from_entries(entries: impl IntoIterator<Item = (LocaleId, D)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Descriptor for a locale
    pub fn get(&self, locale: LocaleId) -> Option<&D> {
        self.entries.get(&locale)
    }

    /// Whether a locale has a descriptor
    pub fn contains(&self, locale: LocaleId) -> bool {
        self.entries.contains_key(&locale)
    }

    /// Whether every supported locale has a descriptor
    pub fn is_total(&self) -> bool {
        LocaleId::ALL.iter().all(|id| self.contains(*id))
    }

    /// Supported locales that have no descriptor
    pub fn missing(&self) -> Vec<LocaleId> {
        LocaleId::ALL
            .iter()
            .copied()
            .filter(|id| !self.contains(*id))
            .collect()
    }
}

impl ComponentLocaleRegistry<UiLocaleDescriptor> {
    /// Registry of the bundled descriptors
    pub fn builtin() -> Self {
        Self::from_fn(UiLocaleDescriptor::for_locale)
    }
}

// ==================== UI Locale Descriptor ====================

/// Pagination labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLabels {
    pub items_per_page: String,
    pub jump_to: String,
    pub page: String,
    pub prev_page: String,
    pub next_page: String,
}

/// Dialog button labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalLabels {
    pub ok_text: String,
    pub cancel_text: String,
}

/// Localized defaults for UI components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiLocaleDescriptor {
    /// Component library locale code (`zh_CN`, `en_US`, `ru_RU`)
    pub library_code: String,
    /// `strftime` pattern for dates
    pub date_format: String,
    /// `strftime` pattern for times
    pub time_format: String,
    /// First column of calendars
    pub first_day_of_week: Weekday,
    pub pagination: PaginationLabels,
    pub modal: ModalLabels,
    /// Placeholder shown by empty tables and lists
    pub empty_text: String,
}

impl UiLocaleDescriptor {
    /// Bundled descriptor for a locale
    pub fn for_locale(locale: LocaleId) -> Self {
        match locale {
            LocaleId::ZhCn => Self {
                library_code: "zh_CN".into(),
                date_format: "%Y-%m-%d".into(),
                time_format: "%H:%M:%S".into(),
                first_day_of_week: Weekday::Mon,
                pagination: PaginationLabels {
                    items_per_page: "条/页".into(),
                    jump_to: "跳至".into(),
                    page: "页".into(),
                    prev_page: "上一页".into(),
                    next_page: "下一页".into(),
                },
                modal: ModalLabels {
                    ok_text: "确定".into(),
                    cancel_text: "取消".into(),
                },
                empty_text: "暂无数据".into(),
            },
            LocaleId::EnUs => Self {
                library_code: "en_US".into(),
                date_format: "%m/%d/%Y".into(),
                time_format: "%I:%M:%S %p".into(),
                first_day_of_week: Weekday::Sun,
                pagination: PaginationLabels {
                    items_per_page: "/ page".into(),
                    jump_to: "Go to".into(),
                    page: "Page".into(),
                    prev_page: "Previous Page".into(),
                    next_page: "Next Page".into(),
                },
                modal: ModalLabels {
                    ok_text: "OK".into(),
                    cancel_text: "Cancel".into(),
                },
                empty_text: "No data".into(),
            },
            LocaleId::RuRu => Self {
                library_code: "ru_RU".into(),
                date_format: "%d.%m.%Y".into(),
                time_format: "%H:%M:%S".into(),
                first_day_of_week: Weekday::Mon,
                pagination: PaginationLabels {
                    items_per_page: "/ стр.".into(),
                    jump_to: "Перейти".into(),
                    page: "Страница".into(),
                    prev_page: "Назад".into(),
                    next_page: "Вперед".into(),
                },
                modal: ModalLabels {
                    ok_text: "OK".into(),
                    cancel_text: "Отмена".into(),
                },
                empty_text: "Нет данных".into(),
            },
        }
    }

    /// Format a date with this locale's pattern
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}
