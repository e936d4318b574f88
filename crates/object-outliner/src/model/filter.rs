//! Named, toggleable structural filters.
//!
//! A [`Filter`] tests one object and is one of three kinds:
//!
//! - [`FilterKind::Classes`] - the object is an instance of, or derives from,
//!   any listed class
//! - [`FilterKind::ClassNames`] - the object's exact runtime class name is
//!   listed (no inheritance walk)
//! - [`FilterKind::Custom`] - an arbitrary predicate
//!
//! # Example
//!
//! ```
//! use object_outliner::model::Filter;
//! use object_outliner_core::ObjectRegistry;
//!
//! let mut registry = ObjectRegistry::new();
//! let object = registry.register_class("Object", None).unwrap();
//! let actor = registry.register_class("Actor", Some(object)).unwrap();
//! let hero = registry.spawn(actor, "Hero", None).unwrap();
//!
//! let filter = Filter::for_classes("Filter_Actor", "Actors", [actor], &registry);
//! assert_eq!(filter.tooltip(), "Filter for classes derived from:\n    Actor");
//! assert!(filter.is_pass(registry.get(hero)));
//! assert!(!filter.is_pass(None));
//! ```

use std::fmt;
use std::sync::Arc;

use object_outliner_core::logging::targets;
use object_outliner_core::{ClassId, ObjectRef, ObjectRegistry};

/// Predicate used by custom filters.
pub type ObjectPredicate = Arc<dyn Fn(ObjectRef<'_>) -> bool + Send + Sync>;

/// Indentation used for class lists in generated tooltips.
const TOOLTIP_INDENT: &str = "    ";

/// What a filter tests. Fixed at construction.
#[derive(Clone)]
pub enum FilterKind {
    /// Instance of (or derived from) any of these classes.
    Classes(Vec<ClassId>),
    /// Exact runtime class name is one of these.
    ClassNames(Vec<String>),
    /// Arbitrary predicate.
    Custom(ObjectPredicate),
}

impl fmt::Debug for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classes(classes) => f.debug_tuple("Classes").field(classes).finish(),
            Self::ClassNames(names) => f.debug_tuple("ClassNames").field(names).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named structural filter with an enabled flag.
///
/// The enabled flag is the only state that changes after construction.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    title: String,
    tooltip: String,
    enabled: bool,
    kind: FilterKind,
}

impl Filter {
    /// Creates a filter passing instances of any of `classes` or their subclasses.
    ///
    /// The tooltip lists the class names. Classes unknown to `registry` are
    /// dropped with a warning.
    pub fn for_classes(
        name: impl Into<String>,
        title: impl Into<String>,
        classes: impl IntoIterator<Item = ClassId>,
        registry: &ObjectRegistry,
    ) -> Self {
        let name = name.into();
        let mut class_names = Vec::new();
        let classes: Vec<ClassId> = classes
            .into_iter()
            .filter(|&class| match registry.class_name(class) {
                Ok(class_name) => {
                    class_names.push(class_name.to_string());
                    true
                }
                Err(_) => {
                    tracing::warn!(target: targets::FILTER, filter = %name, ?class, "dropping unregistered class");
                    false
                }
            })
            .collect();

        Self {
            tooltip: build_tooltip("Filter for classes derived from:", &class_names),
            title: title.into(),
            name,
            enabled: false,
            kind: FilterKind::Classes(classes),
        }
    }

    /// Creates a filter passing objects whose exact class name is listed.
    ///
    /// Blank names are dropped with a warning.
    pub fn for_class_names<S: Into<String>>(
        name: impl Into<String>,
        title: impl Into<String>,
        class_names: impl IntoIterator<Item = S>,
    ) -> Self {
        let name = name.into();
        let class_names: Vec<String> = class_names
            .into_iter()
            .map(Into::into)
            .filter(|class_name: &String| {
                let blank = class_name.trim().is_empty();
                if blank {
                    tracing::warn!(target: targets::FILTER, filter = %name, "dropping blank class name");
                }
                !blank
            })
            .collect();

        Self {
            tooltip: build_tooltip("Filter for exact classes", &class_names),
            title: title.into(),
            name,
            enabled: false,
            kind: FilterKind::ClassNames(class_names),
        }
    }

    /// Creates a filter backed by an arbitrary predicate.
    pub fn custom<F>(
        name: impl Into<String>,
        title: impl Into<String>,
        tooltip: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(ObjectRef<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            title: title.into(),
            tooltip: tooltip.into(),
            enabled: false,
            kind: FilterKind::Custom(Arc::new(predicate)),
        }
    }

    /// Replaces the tooltip. A blank tooltip keeps the current one.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        let tooltip = tooltip.into();
        if !tooltip.trim().is_empty() {
            self.tooltip = tooltip;
        }
        self
    }

    /// Sets the initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Stable unique key of the filter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tooltip text.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Whether the filter is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the filter.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// What the filter tests.
    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    /// Tests an object. A missing object never passes.
    pub fn is_pass(&self, object: Option<ObjectRef<'_>>) -> bool {
        let Some(object) = object else {
            return false;
        };

        match &self.kind {
            FilterKind::Classes(classes) => classes.iter().any(|&class| object.is_a(class)),
            FilterKind::ClassNames(names) => {
                let class_name = object.class_name();
                names.iter().any(|name| name == class_name)
            }
            FilterKind::Custom(predicate) => predicate(object),
        }
    }
}

fn build_tooltip(heading: &str, entries: &[String]) -> String {
    let mut tooltip = heading.to_string();
    for entry in entries {
        tooltip.push('\n');
        tooltip.push_str(TOOLTIP_INDENT);
        tooltip.push_str(entry);
    }
    tooltip
}
