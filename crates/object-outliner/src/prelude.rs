//! Commonly used types.
//!
//! ```
//! use object_outliner::prelude::*;
//! ```

// ============================================================================
// Population
// ============================================================================

pub use object_outliner_core::{
    ClassId, ObjectFlags, ObjectId, ObjectRef, ObjectRegistry, SharedObjectRegistry, Signal,
};

// ============================================================================
// Filtering and Content
// ============================================================================

pub use crate::model::{
    ContentCounts, DisplayMode, Filter, FilterKind, FilterSet, ItemId, OutlinerItem, OutlinerModel,
    OutlinerTree, SortColumn, SortMode, TextFilter,
};

// ============================================================================
// Presentation
// ============================================================================

pub use crate::catalog::{drop_down_filters, imperative_filters, register_engine_classes};
pub use crate::view::{ContextAction, OutlinerView, RowPresentation, RowTint, StatusTone};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::config::{OutlinerSettings, Settings, SharedSettings};
pub use crate::error::{OutlinerError, OutlinerResult};
