//! Filtering and content building for the outliner.
//!
//! # Core Types
//!
//! - [`Filter`]: a named, toggleable structural predicate
//! - [`FilterSet`]: an ordered group of filters with aggregate predicates
//! - [`TextFilter`]: free-text search over per-object strings
//! - [`OutlinerTree`] / [`OutlinerItem`]: the built content
//! - [`OutlinerModel`]: runs the scan and builds the content
//!
//! # Pipeline
//!
//! ```text
//! population ──> structural filter ──> text filter ──┬─> list: one root per object
//!   (scan)        (filtered count)                  └─> tree: insert with outer chain
//! ```
//!
//! Every rebuild starts from scratch. Node ids from an earlier rebuild are
//! meaningless afterwards; state that must survive a rebuild is keyed by
//! [`ObjectId`](object_outliner_core::ObjectId) and re-resolved through
//! [`OutlinerTree::item_for`].

mod filter;
mod filter_set;
mod item;
mod outliner_model;
mod sort;
mod text_filter;

pub use filter::{Filter, FilterKind, ObjectPredicate};
pub use filter_set::FilterSet;
pub use item::{ItemId, OutlinerItem, OutlinerTree};
pub use outliner_model::{ContentCounts, DisplayMode, ObjectFilterFn, OutlinerModel};
pub use sort::{compare, compare_objects, sort_items, SortColumn, SortMode};
pub use text_filter::{StringifyFn, TextFilter, TextQuery};
