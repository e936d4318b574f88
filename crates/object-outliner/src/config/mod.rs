//! Persisted configuration.
//!
//! - [`Settings`] - Hierarchical key/value store with JSON and TOML persistence
//! - [`OutlinerSettings`] - The typed outliner fields stored inside it
//! - [`default_settings_path`] - Per-user location of the settings file

mod atomic;
mod error;
mod outliner_settings;
mod settings;

use std::path::PathBuf;

use directories::BaseDirs;

pub use atomic::{atomic_write, AtomicWriter};
pub use error::{ConfigError, ConfigResult};
pub use outliner_settings::{keys, OutlinerSettings, GROUP};
pub use settings::{FromSettingsValue, Settings, SettingsFormat, SettingsValue, SharedSettings};

/// Directory name used under the platform config directory.
pub const APPLICATION_DIR: &str = "object-outliner";

/// File name of the settings file.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Returns `<config dir>/object-outliner/settings.toml`.
///
/// Returns `None` if no home directory can be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APPLICATION_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_path_shape() {
        if let Some(path) = default_settings_path() {
            assert!(path.ends_with("object-outliner/settings.toml"));
        }
    }
}
