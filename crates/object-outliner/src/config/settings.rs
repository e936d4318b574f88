//! Hierarchical key/value settings store.
//!
//! Keys are paths using either "." or "/" as separators:
//!
//! ```
//! use object_outliner::config::Settings;
//!
//! let settings = Settings::new();
//! settings.set("object_outliner.show_only_checked", true);
//! settings.set("object_outliner/display_mode", "tree");
//!
//! assert_eq!(settings.get::<bool>("object_outliner.show_only_checked"), Some(true));
//! assert_eq!(settings.get_or("object_outliner.sort_mode", "ascending".to_string()), "ascending");
//! ```
//!
//! Connect to [`Settings::changed`] to observe writes. With auto-save enabled
//! every write is persisted immediately; otherwise call [`Settings::sync`].
//! [`Settings::set_many`] applies several keys with a single save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_outliner_core::logging::targets;
use object_outliner_core::Signal;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::atomic::atomic_write;
use super::error::{ConfigError, ConfigResult};

/// A value that can be stored in settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    /// A null/empty value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A string value.
    String(String),
    /// An array of values.
    Array(Vec<SettingsValue>),
    /// A nested table.
    Object(HashMap<String, SettingsValue>),
}

impl SettingsValue {
    /// Returns this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingsValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingsValue::Float(v) => Some(*v),
            SettingsValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingsValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[SettingsValue]> {
        match self {
            SettingsValue::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SettingsValue::Null => "null",
            SettingsValue::Bool(_) => "bool",
            SettingsValue::Integer(_) => "integer",
            SettingsValue::Float(_) => "float",
            SettingsValue::String(_) => "string",
            SettingsValue::Array(_) => "array",
            SettingsValue::Object(_) => "table",
        }
    }
}

impl From<bool> for SettingsValue {
    fn from(v: bool) -> Self {
        SettingsValue::Bool(v)
    }
}

impl From<i64> for SettingsValue {
    fn from(v: i64) -> Self {
        SettingsValue::Integer(v)
    }
}

impl From<i32> for SettingsValue {
    fn from(v: i32) -> Self {
        SettingsValue::Integer(v as i64)
    }
}

impl From<f64> for SettingsValue {
    fn from(v: f64) -> Self {
        SettingsValue::Float(v)
    }
}

impl From<String> for SettingsValue {
    fn from(v: String) -> Self {
        SettingsValue::String(v)
    }
}

impl From<&str> for SettingsValue {
    fn from(v: &str) -> Self {
        SettingsValue::String(v.to_string())
    }
}

impl<T: Into<SettingsValue>> From<Vec<T>> for SettingsValue {
    fn from(v: Vec<T>) -> Self {
        SettingsValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// Trait for types that can be extracted from a [`SettingsValue`].
pub trait FromSettingsValue: Sized {
    /// Attempts to convert a SettingsValue to this type.
    fn from_settings_value(value: &SettingsValue) -> Option<Self>;
}

impl FromSettingsValue for bool {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSettingsValue for i64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromSettingsValue for f64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromSettingsValue for String {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl<T: FromSettingsValue> FromSettingsValue for Vec<T> {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value
            .as_array()
            .and_then(|arr| arr.iter().map(T::from_settings_value).collect())
    }
}

impl FromSettingsValue for SettingsValue {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// On-disk format of a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// JSON format.
    Json,
    /// TOML format.
    Toml,
}

impl SettingsFormat {
    /// Picks the format from a file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Clone)]
struct AutoSaveConfig {
    path: PathBuf,
    format: SettingsFormat,
}

/// A hierarchical key/value settings storage.
pub struct Settings {
    data: RwLock<HashMap<String, SettingsValue>>,
    /// Emitted with the full key path after every write.
    changed: Signal<String>,
    auto_save: RwLock<Option<AutoSaveConfig>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Creates a new empty settings store.
    pub fn new() -> Self {
        Self::from_data(HashMap::new())
    }

    /// Creates settings from an existing table.
    pub fn from_data(data: HashMap<String, SettingsValue>) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Signal::new(),
            auto_save: RwLock::new(None),
        }
    }

    /// Opens the settings file at `path` and keeps it as the auto-save target.
    ///
    /// A missing file yields an empty store. The format follows the extension.
    pub fn open(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path);
        let settings = if path.exists() {
            match format {
                SettingsFormat::Json => Self::load_json(path)?,
                SettingsFormat::Toml => Self::load_toml(path)?,
            }
        } else {
            tracing::debug!(target: targets::CONFIG, path = %path.display(), "no settings file yet");
            Self::new()
        };
        settings.set_auto_save(path, format);
        Ok(settings)
    }

    /// The signal emitted whenever a setting is modified.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Enables auto-save to the specified file.
    pub fn set_auto_save(&self, path: impl AsRef<Path>, format: SettingsFormat) {
        *self.auto_save.write() = Some(AutoSaveConfig {
            path: path.as_ref().to_path_buf(),
            format,
        });
    }

    /// Returns true if auto-save is enabled.
    pub fn is_auto_save_enabled(&self) -> bool {
        self.auto_save.read().is_some()
    }

    /// Sets a value at the specified path, creating intermediate tables.
    pub fn set<V: Into<SettingsValue>>(&self, path: &str, value: V) {
        self.set_many([(path, value.into())]);
    }

    /// Sets several values under one write lock and auto-saves once.
    ///
    /// `changed` fires for each key after the save, so observers always see
    /// the whole batch on disk.
    pub fn set_many<'k, I>(&self, entries: I)
    where
        I: IntoIterator<Item = (&'k str, SettingsValue)>,
    {
        let mut written = Vec::new();
        {
            let mut data = self.data.write();
            for (path, value) in entries {
                let parts = parse_path(path);
                if parts.is_empty() {
                    continue;
                }
                set_nested(&mut data, &parts, value);
                written.push(path.to_string());
            }
        }
        if written.is_empty() {
            return;
        }

        self.try_auto_save();
        for path in written {
            self.changed.emit(path);
        }
    }

    /// Gets a value at the specified path.
    ///
    /// Returns `None` if the path doesn't exist or has a different type.
    pub fn get<T: FromSettingsValue>(&self, path: &str) -> Option<T> {
        let data = self.data.read();
        get_nested(&data, &parse_path(path)).and_then(T::from_settings_value)
    }

    /// Gets a value at the specified path, or returns the default.
    pub fn get_or<T: FromSettingsValue>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    /// Gets the raw `SettingsValue` at the specified path.
    pub fn get_raw(&self, path: &str) -> Option<SettingsValue> {
        let data = self.data.read();
        get_nested(&data, &parse_path(path)).cloned()
    }

    /// Returns true if a value exists at the specified path.
    pub fn contains(&self, path: &str) -> bool {
        let data = self.data.read();
        get_nested(&data, &parse_path(path)).is_some()
    }

    /// Removes a value at the specified path, returning it.
    pub fn remove(&self, path: &str) -> Option<SettingsValue> {
        let parts = parse_path(path);
        if parts.is_empty() {
            return None;
        }

        let removed = remove_nested(&mut self.data.write(), &parts);
        if removed.is_some() {
            self.changed.emit(path.to_string());
            self.try_auto_save();
        }
        removed
    }

    /// Returns all keys at the top level.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Returns all keys directly under a group path.
    pub fn group_keys(&self, path: &str) -> Vec<String> {
        let data = self.data.read();
        match get_nested(&data, &parse_path(path)) {
            Some(SettingsValue::Object(obj)) => obj.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if there are no settings.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Loads settings from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let data: HashMap<String, SettingsValue> = serde_json::from_str(&content)?;
        Ok(Self::from_data(data))
    }

    /// Loads settings from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let table: toml::Table = content.parse()?;
        let data = table
            .into_iter()
            .map(|(k, v)| (k, toml_to_settings(v)))
            .collect();
        Ok(Self::from_data(data))
    }

    /// Saves settings to a JSON file atomically.
    pub fn save_json(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(&*self.data.read())?;
        atomic_write(path, json.as_bytes())
    }

    /// Saves settings to a TOML file atomically.
    ///
    /// TOML has no null, so null entries are omitted.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let table = settings_to_toml_table(&self.data.read());
        let toml_str = toml::to_string_pretty(&table)?;
        atomic_write(path, toml_str.as_bytes())
    }

    /// Writes the store to its auto-save target, if one is configured.
    pub fn sync(&self) -> ConfigResult<()> {
        let config = self.auto_save.read().clone();
        match config {
            Some(config) => match config.format {
                SettingsFormat::Json => self.save_json(&config.path),
                SettingsFormat::Toml => self.save_toml(&config.path),
            },
            None => Ok(()),
        }
    }

    fn try_auto_save(&self) {
        if let Err(e) = self.sync() {
            tracing::error!(target: targets::CONFIG, error = %e, "failed to auto-save settings");
        }
    }
}

/// A thread-safe, reference-counted settings handle.
pub type SharedSettings = Arc<Settings>;

static_assertions::assert_impl_all!(Settings: Send, Sync);

fn parse_path(path: &str) -> Vec<&str> {
    path.split(['.', '/']).filter(|s| !s.is_empty()).collect()
}

fn get_nested<'a>(
    data: &'a HashMap<String, SettingsValue>,
    parts: &[&str],
) -> Option<&'a SettingsValue> {
    let (first, rest) = parts.split_first()?;
    let value = data.get(*first)?;
    if rest.is_empty() {
        Some(value)
    } else {
        match value {
            SettingsValue::Object(obj) => get_nested(obj, rest),
            _ => None,
        }
    }
}

fn set_nested(data: &mut HashMap<String, SettingsValue>, parts: &[&str], value: SettingsValue) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };

    if rest.is_empty() {
        data.insert(first.to_string(), value);
        return;
    }

    let entry = data
        .entry(first.to_string())
        .or_insert_with(|| SettingsValue::Object(HashMap::new()));
    if !matches!(entry, SettingsValue::Object(_)) {
        *entry = SettingsValue::Object(HashMap::new());
    }
    if let SettingsValue::Object(obj) = entry {
        set_nested(obj, rest, value);
    }
}

fn remove_nested(data: &mut HashMap<String, SettingsValue>, parts: &[&str]) -> Option<SettingsValue> {
    let (first, rest) = parts.split_first()?;
    if rest.is_empty() {
        return data.remove(*first);
    }
    match data.get_mut(*first)? {
        SettingsValue::Object(obj) => remove_nested(obj, rest),
        _ => None,
    }
}

fn toml_to_settings(value: toml::Value) -> SettingsValue {
    match value {
        toml::Value::String(s) => SettingsValue::String(s),
        toml::Value::Integer(i) => SettingsValue::Integer(i),
        toml::Value::Float(f) => SettingsValue::Float(f),
        toml::Value::Boolean(b) => SettingsValue::Bool(b),
        toml::Value::Datetime(dt) => SettingsValue::String(dt.to_string()),
        toml::Value::Array(arr) => {
            SettingsValue::Array(arr.into_iter().map(toml_to_settings).collect())
        }
        toml::Value::Table(table) => SettingsValue::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_settings(v)))
                .collect(),
        ),
    }
}

fn settings_to_toml(value: &SettingsValue) -> Option<toml::Value> {
    Some(match value {
        SettingsValue::Null => return None,
        SettingsValue::Bool(b) => toml::Value::Boolean(*b),
        SettingsValue::Integer(i) => toml::Value::Integer(*i),
        SettingsValue::Float(f) => toml::Value::Float(*f),
        SettingsValue::String(s) => toml::Value::String(s.clone()),
        SettingsValue::Array(arr) => {
            toml::Value::Array(arr.iter().filter_map(settings_to_toml).collect())
        }
        SettingsValue::Object(obj) => toml::Value::Table(settings_to_toml_table(obj)),
    })
}

fn settings_to_toml_table(data: &HashMap<String, SettingsValue>) -> toml::Table {
    data.iter()
        .filter_map(|(k, v)| settings_to_toml(v).map(|v| (k.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_basic_get_set() {
        let settings = Settings::new();

        settings.set("name", "outliner");
        settings.set("count", 42);
        settings.set("enabled", true);

        assert_eq!(settings.get::<String>("name"), Some("outliner".to_string()));
        assert_eq!(settings.get::<i64>("count"), Some(42));
        assert_eq!(settings.get::<bool>("enabled"), Some(true));
        assert_eq!(settings.get::<bool>("name"), None);
    }

    #[test]
    fn test_nested_paths() {
        let settings = Settings::new();

        settings.set("object_outliner.display_mode", "tree");
        settings.set("object_outliner/sort_column", "class");

        assert_eq!(
            settings.get::<String>("object_outliner/display_mode"),
            Some("tree".to_string())
        );
        let mut keys = settings.group_keys("object_outliner");
        keys.sort();
        assert_eq!(keys, vec!["display_mode", "sort_column"]);
    }

    #[test]
    fn test_contains_and_remove() {
        let settings = Settings::new();

        settings.set("key", "value");
        assert!(settings.contains("key"));

        let removed = settings.remove("key");
        assert_eq!(removed, Some(SettingsValue::String("value".to_string())));
        assert!(!settings.contains("key"));
        assert!(settings.remove("key").is_none());
    }

    #[test]
    fn test_string_arrays() {
        let settings = Settings::new();
        settings.set("names", vec!["Filter_CDO", "Filter_Actor"]);

        let names: Vec<String> = settings.get("names").unwrap();
        assert_eq!(names, vec!["Filter_CDO".to_string(), "Filter_Actor".to_string()]);
    }

    #[test]
    fn test_change_signal_reports_key() {
        let settings = Settings::new();
        let change_count = Arc::new(AtomicUsize::new(0));
        let last_key = Arc::new(parking_lot::Mutex::new(String::new()));

        let count_clone = change_count.clone();
        let key_clone = last_key.clone();
        settings.changed().connect(move |key| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            *key_clone.lock() = key.clone();
        });

        settings.set("a", 1);
        settings.set("b.c", 2);

        assert_eq!(change_count.load(Ordering::SeqCst), 2);
        assert_eq!(*last_key.lock(), "b.c");
    }

    #[test]
    fn test_set_many_saves_the_whole_batch_before_notifying() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = Settings::open(&path).unwrap();

        let snapshots = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let snapshots_clone = snapshots.clone();
        let file = path.clone();
        settings.changed().connect(move |_| {
            let on_disk = Settings::load_toml(&file).unwrap();
            snapshots_clone
                .lock()
                .push((on_disk.get::<i64>("batch.a"), on_disk.get::<i64>("batch.b")));
        });

        settings.set_many([
            ("batch.a", SettingsValue::from(1)),
            ("", SettingsValue::from(5)),
            ("batch.b", SettingsValue::from(2)),
        ]);

        let snapshots = snapshots.lock();
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots.iter().all(|&pair| pair == (Some(1), Some(2))));
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings::new();
        settings.set("name", "test");
        settings.set("nested.value", true);
        settings.save_json(&path).unwrap();

        let loaded = Settings::load_json(&path).unwrap();
        assert_eq!(loaded.get::<String>("name"), Some("test".to_string()));
        assert_eq!(loaded.get::<bool>("nested.value"), Some(true));
    }

    #[test]
    fn test_toml_roundtrip_omits_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let settings = Settings::new();
        settings.set("group.names", vec!["a", "b"]);
        settings.set("group.flag", false);
        settings.set("nothing", SettingsValue::Null);
        settings.save_toml(&path).unwrap();

        let loaded = Settings::load_toml(&path).unwrap();
        assert_eq!(
            loaded.get::<Vec<String>>("group.names"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(loaded.get::<bool>("group.flag"), Some(false));
        assert!(!loaded.contains("nothing"));
    }

    #[test]
    fn test_open_missing_file_then_auto_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outliner").join("settings.toml");

        let settings = Settings::open(&path).unwrap();
        assert!(settings.is_empty());
        assert!(settings.is_auto_save_enabled());

        settings.set("object_outliner.show_only_checked", true);
        assert!(path.exists());

        let reopened = Settings::open(&path).unwrap();
        assert_eq!(reopened.get::<bool>("object_outliner.show_only_checked"), Some(true));
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let result = Settings::load_toml(&path);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load_json(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SettingsFormat::from_path(Path::new("a.JSON")), SettingsFormat::Json);
        assert_eq!(SettingsFormat::from_path(Path::new("a.toml")), SettingsFormat::Toml);
        assert_eq!(SettingsFormat::from_path(Path::new("a")), SettingsFormat::Toml);
    }
}
