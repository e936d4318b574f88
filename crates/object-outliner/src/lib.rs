//! A filterable, hierarchical outliner over a live object population.
//!
//! The outliner scans every live object in an
//! [`ObjectRegistry`](object_outliner_core::ObjectRegistry), narrows the
//! population down through named structural filters and a free-text search,
//! and presents the result either as a flat list or grouped under each
//! object's outer chain. Selection and expansion survive rebuilds as long as
//! the objects they refer to are still shown.
//!
//! # Modules
//!
//! - [`model`]: filters, the text filter, the outliner tree and the model that builds it
//! - [`view`]: the presentation adapter driving the model from user actions
//! - [`catalog`]: the default filter catalog and engine class hierarchy
//! - [`config`]: settings persistence
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use object_outliner::prelude::*;
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! registry.with_write(register_engine_classes).unwrap();
//! let (package, actor) = registry.with_read(|r| {
//!     (r.find_class("Package").unwrap(), r.find_class("Actor").unwrap())
//! });
//! let map = registry.spawn(package, "/Game/Map", None).unwrap();
//! let hero = registry.spawn(actor, "Hero", Some(map)).unwrap();
//!
//! let mut view = OutlinerView::new(registry, Arc::new(Settings::new())).unwrap();
//! view.set_display_mode(DisplayMode::Tree);
//!
//! // The package is shown only because the actor inside it passed.
//! let root = view.root_items()[0];
//! assert!(view.row(root).unwrap().subdued);
//! assert_eq!(view.children(root).len(), 1);
//! assert!(view.select_object(hero));
//! ```

pub mod catalog;
pub mod config;
mod error;
pub mod model;
pub mod prelude;
pub mod view;

pub use error::{OutlinerError, OutlinerResult};
