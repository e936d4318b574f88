//! Error types for the outliner.

use object_outliner_core::ObjectError;

use crate::config::ConfigError;

/// The main error type for outliner operations.
#[derive(Debug, thiserror::Error)]
pub enum OutlinerError {
    /// Two filters in one set share a name.
    #[error("a filter named '{0}' is already registered in this set")]
    DuplicateFilterName(String),

    /// No filter with this name exists in the set.
    #[error("no filter named '{0}'")]
    UnknownFilter(String),

    /// An object registry operation failed.
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// Settings could not be read or written.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for outliner operations.
pub type OutlinerResult<T> = std::result::Result<T, OutlinerError>;
