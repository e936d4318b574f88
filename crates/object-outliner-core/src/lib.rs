//! Core systems for the object outliner.
//!
//! This crate provides the foundation the outliner scans and reacts to:
//!
//! - **Object Model**: Classes with single inheritance, objects with outer/inner
//!   ownership, names, flags and resource sizes
//! - **Weak References**: Versioned [`ObjectId`]s that stop resolving once the
//!   object is destroyed
//! - **Signal/Slot System**: Type-safe change notification
//! - **Logging**: Tracing targets, tree dumps and performance spans
//!
//! # Object Example
//!
//! ```
//! use object_outliner_core::{ObjectFlags, ObjectRegistry};
//!
//! let mut registry = ObjectRegistry::new();
//! let object = registry.register_class("Object", None).unwrap();
//! let actor = registry.register_class("Actor", Some(object)).unwrap();
//!
//! let level = registry.spawn(object, "PersistentLevel", None).unwrap();
//! let hero = registry.spawn(actor, "Hero", Some(level)).unwrap();
//! registry.set_flags(hero, ObjectFlags::TRANSIENT).unwrap();
//!
//! let hero_ref = registry.get(hero).unwrap();
//! assert!(hero_ref.is_a(object));
//! assert_eq!(hero_ref.path_name(), "PersistentLevel.Hero");
//!
//! registry.destroy(level).unwrap();
//! assert!(registry.get(hero).is_none());
//! ```
//!
//! # Signal/Slot Example
//!
//! ```
//! use object_outliner_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod object;
pub mod signal;

pub use error::{CoreError, Result, SignalError};
pub use logging::{ObjectTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use object::{
    ClassId, ObjectError, ObjectFlags, ObjectId, ObjectRef, ObjectRegistry, ObjectResult,
    SharedObjectRegistry,
};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
