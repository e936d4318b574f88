//! Typed view of the persisted outliner fields.

use std::collections::BTreeSet;

use object_outliner_core::logging::targets;

use super::error::{ConfigError, ConfigResult};
use super::settings::{Settings, SettingsValue};
use crate::model::{DisplayMode, SortColumn, SortMode};

/// Settings group every outliner key lives under.
pub const GROUP: &str = "object_outliner";

/// Keys within [`GROUP`].
pub mod keys {
    /// Names of enabled imperative filters.
    pub const ACTIVE_IMPERATIVE_FILTERS: &str = "object_outliner.active_imperative_filters";
    /// Names of enabled drop-down filters.
    pub const ACTIVE_DROP_DOWN_FILTERS: &str = "object_outliner.active_drop_down_filters";
    /// Whether only objects matching an enabled drop-down filter are shown.
    pub const SHOW_ONLY_CHECKED: &str = "object_outliner.show_only_checked";
    /// `list` or `tree`.
    pub const DISPLAY_MODE: &str = "object_outliner.display_mode";
    /// `name`, `class` or `memory`.
    pub const SORT_COLUMN: &str = "object_outliner.sort_column";
    /// `ascending` or `descending`.
    pub const SORT_MODE: &str = "object_outliner.sort_mode";
}

/// The outliner state that survives between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlinerSettings {
    /// Names of enabled imperative filters.
    pub active_imperative_filters: BTreeSet<String>,
    /// Names of enabled drop-down filters.
    pub active_drop_down_filters: BTreeSet<String>,
    /// Require a match against an enabled drop-down filter.
    pub show_only_checked: bool,
    /// Flat list or ownership tree.
    pub display_mode: DisplayMode,
    /// Column rows are sorted by.
    pub sort_column: SortColumn,
    /// Sort direction.
    pub sort_mode: SortMode,
}

impl OutlinerSettings {
    /// Reads every field, falling back to defaults for missing or malformed keys.
    pub fn load(settings: &Settings) -> Self {
        let defaults = Self::default();
        Self {
            active_imperative_filters: or_default(
                read_name_set(settings, keys::ACTIVE_IMPERATIVE_FILTERS),
                defaults.active_imperative_filters,
            ),
            active_drop_down_filters: or_default(
                read_name_set(settings, keys::ACTIVE_DROP_DOWN_FILTERS),
                defaults.active_drop_down_filters,
            ),
            show_only_checked: or_default(
                read_bool(settings, keys::SHOW_ONLY_CHECKED),
                defaults.show_only_checked,
            ),
            display_mode: or_default(
                read_named(settings, keys::DISPLAY_MODE, DisplayMode::from_name),
                defaults.display_mode,
            ),
            sort_column: or_default(
                read_named(settings, keys::SORT_COLUMN, SortColumn::from_name),
                defaults.sort_column,
            ),
            sort_mode: or_default(
                read_named(settings, keys::SORT_MODE, SortMode::from_name),
                defaults.sort_mode,
            ),
        }
    }

    /// Reads every field, failing on the first malformed key.
    ///
    /// Missing keys still take their defaults.
    pub fn try_load(settings: &Settings) -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            active_imperative_filters: read_name_set(settings, keys::ACTIVE_IMPERATIVE_FILTERS)?
                .unwrap_or(defaults.active_imperative_filters),
            active_drop_down_filters: read_name_set(settings, keys::ACTIVE_DROP_DOWN_FILTERS)?
                .unwrap_or(defaults.active_drop_down_filters),
            show_only_checked: read_bool(settings, keys::SHOW_ONLY_CHECKED)?
                .unwrap_or(defaults.show_only_checked),
            display_mode: read_named(settings, keys::DISPLAY_MODE, DisplayMode::from_name)?
                .unwrap_or(defaults.display_mode),
            sort_column: read_named(settings, keys::SORT_COLUMN, SortColumn::from_name)?
                .unwrap_or(defaults.sort_column),
            sort_mode: read_named(settings, keys::SORT_MODE, SortMode::from_name)?
                .unwrap_or(defaults.sort_mode),
        })
    }

    /// Writes every field into `settings`.
    pub fn store(&self, settings: &Settings) {
        settings.set_many([
            (
                keys::ACTIVE_IMPERATIVE_FILTERS,
                SettingsValue::from(name_list(&self.active_imperative_filters)),
            ),
            (
                keys::ACTIVE_DROP_DOWN_FILTERS,
                SettingsValue::from(name_list(&self.active_drop_down_filters)),
            ),
            (keys::SHOW_ONLY_CHECKED, SettingsValue::from(self.show_only_checked)),
            (keys::DISPLAY_MODE, SettingsValue::from(self.display_mode.name())),
            (keys::SORT_COLUMN, SettingsValue::from(self.sort_column.name())),
            (keys::SORT_MODE, SettingsValue::from(self.sort_mode.name())),
        ]);
    }
}

fn name_list(names: &BTreeSet<String>) -> Vec<String> {
    names.iter().cloned().collect()
}

fn or_default<T>(value: ConfigResult<Option<T>>, default: T) -> T {
    match value {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(target: targets::CONFIG, error = %e, "ignoring persisted outliner setting");
            default
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn read_bool(settings: &Settings, key: &str) -> ConfigResult<Option<bool>> {
    match settings.get_raw(key) {
        None | Some(SettingsValue::Null) => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(key, format!("expected bool, found {}", value.kind()))),
    }
}

fn read_name_set(settings: &Settings, key: &str) -> ConfigResult<Option<BTreeSet<String>>> {
    match settings.get_raw(key) {
        None | Some(SettingsValue::Null) => Ok(None),
        Some(SettingsValue::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, format!("expected filter name, found {}", item.kind())))
            })
            .collect::<ConfigResult<BTreeSet<_>>>()
            .map(Some),
        Some(value) => Err(invalid(key, format!("expected array, found {}", value.kind()))),
    }
}

fn read_named<T>(
    settings: &Settings,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> ConfigResult<Option<T>> {
    match settings.get_raw(key) {
        None | Some(SettingsValue::Null) => Ok(None),
        Some(SettingsValue::String(name)) => parse(&name)
            .map(Some)
            .ok_or_else(|| invalid(key, format!("unknown value '{name}'"))),
        Some(value) => Err(invalid(key, format!("expected string, found {}", value.kind()))),
    }
}
