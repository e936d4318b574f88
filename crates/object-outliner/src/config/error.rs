//! Error types for settings persistence.

use std::path::PathBuf;

/// Errors raised while loading, saving or interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing a settings file failed.
    #[error("settings I/O failed for {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON could not be parsed or produced.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML could not be parsed.
    #[error("invalid TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML could not be produced.
    #[error("failed to serialize settings as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A stored value has the wrong shape for its key.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// The settings key.
        key: String,
        /// What was wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for settings operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
