//! Presentation adapter: populate, user actions, state restoration and rows.

mod actions;
mod outliner_view;
mod row;

pub use actions::{context_actions, ContextAction};
pub use outliner_view::{FilterStatus, OutlinerView, StatusTone};
pub use row::{format_memory, RowPresentation, RowTint};
