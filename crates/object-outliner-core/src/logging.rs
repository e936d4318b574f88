//! Logging and debugging facilities for the outliner.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for the live object hierarchy
//! - Performance spans for timing rebuilds
//!
//! # Tracing Integration
//!
//! The outliner uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("object_outliner::model=debug")
//!         .init();
//! }
//! ```
//!
//! # Debug Visualization
//!
//! Use [`ObjectTreeDebug`] to dump the outer/inner hierarchy of a registry:
//!
//! ```
//! use object_outliner_core::{ObjectRegistry, ObjectTreeDebug};
//!
//! let mut registry = ObjectRegistry::new();
//! let object = registry.register_class("Object", None).unwrap();
//! registry.spawn(object, "Root", None).unwrap();
//!
//! let dump = ObjectTreeDebug::new(&registry).to_string();
//! assert!(dump.contains("Root"));
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::object::{ObjectId, ObjectRegistry, ObjectResult};

/// Span names used for tracing.
pub mod span_names {
    /// Model rebuild span.
    pub const UPDATE_CONTENT: &str = "object_outliner::update_content";
    /// View populate span.
    pub const POPULATE: &str = "object_outliner::populate";
    /// Sorting span.
    pub const SORT: &str = "object_outliner::sort";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Object registry target.
    pub const OBJECT: &str = "object_outliner::object";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "object_outliner::signal";
    /// Filters and filter sets.
    pub const FILTER: &str = "object_outliner::filter";
    /// Outliner model target.
    pub const MODEL: &str = "object_outliner::model";
    /// View adapter target.
    pub const VIEW: &str = "object_outliner::view";
    /// Persisted settings target.
    pub const CONFIG: &str = "object_outliner::config";
    /// Performance spans.
    pub const PERF: &str = "object_outliner::perf";
}

/// Style options for object tree visualization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for object tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show object IDs.
    pub show_ids: bool,
    /// Whether to show class names.
    pub show_classes: bool,
    /// Whether to show flags and resource size.
    pub show_details: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_classes: true,
            show_details: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_details: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_classes: false,
            show_details: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing the outer/inner hierarchy of a registry.
#[derive(Clone)]
pub struct ObjectTreeDebug<'a> {
    registry: &'a ObjectRegistry,
    options: TreeFormatOptions,
}

impl<'a> ObjectTreeDebug<'a> {
    /// Create a new debug visualizer with default options.
    pub fn new(registry: &'a ObjectRegistry) -> Self {
        Self {
            registry,
            options: TreeFormatOptions::default(),
        }
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(registry: &'a ObjectRegistry, options: TreeFormatOptions) -> Self {
        Self { registry, options }
    }

    /// Format the entire object tree starting from all root objects.
    pub fn format_all(&self) -> String {
        let roots: Vec<ObjectId> = self.registry.root_objects().collect();

        let mut output = String::new();
        let _ = writeln!(
            output,
            "Object Tree ({} total objects):",
            self.registry.object_count()
        );

        if roots.is_empty() {
            output.push_str("  (empty)\n");
        } else {
            for root_id in roots {
                // Roots come straight from the registry, so they always resolve.
                let _ = self.format_subtree_into(root_id, &mut Vec::new(), &mut output);
            }
        }

        output
    }

    /// Format a subtree starting from a specific object.
    pub fn format_subtree(&self, root: ObjectId) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_subtree_into(root, &mut Vec::new(), &mut output)?;
        Ok(output)
    }

    /// `lineage` holds the is-last flags of every non-root ancestor.
    fn format_subtree_into(
        &self,
        id: ObjectId,
        lineage: &mut Vec<bool>,
        output: &mut String,
    ) -> ObjectResult<()> {
        if let Some(max) = self.options.max_depth {
            if lineage.len() > max {
                return Ok(());
            }
        }

        let object = self
            .registry
            .get(id)
            .ok_or(crate::object::ObjectError::InvalidObjectId)?;

        output.push_str(&build_prefix(
            self.options.style,
            self.options.indent_size,
            lineage,
        ));

        let name = object.name();
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }

        if self.options.show_classes {
            let _ = write!(output, " ({})", object.class_name());
        }

        if self.options.show_details {
            let flags = object.flags();
            if flags.class_default {
                output.push_str(" <cdo>");
            }
            if flags.transient {
                output.push_str(" <transient>");
            }
            let _ = write!(output, " {}B", object.resource_size());
        }

        output.push('\n');

        let inners = self.registry.inners(id)?;
        let inner_count = inners.len();
        for (i, &inner_id) in inners.iter().enumerate() {
            lineage.push(i + 1 == inner_count);
            let result = self.format_subtree_into(inner_id, lineage, output);
            lineage.pop();
            result?;
        }

        Ok(())
    }
}

/// Build the branch prefix for a tree line.
///
/// `lineage` holds one is-last flag per level below the root, ending with the
/// line's own node; an empty slice is a root line. Levels whose node was the
/// last child get blank padding instead of a branch.
///
/// Shared by every tree dump so they all read the same.
pub fn build_prefix(style: TreeStyle, indent_size: usize, lineage: &[bool]) -> String {
    let Some((&is_last, ancestors)) = lineage.split_last() else {
        return String::new();
    };

    let (branch, corner, last) = match style {
        TreeStyle::Ascii => ("|", "+--", "`--"),
        TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        TreeStyle::Compact => ("", "-", "-"),
    };

    let mut prefix = String::new();
    for &ancestor_last in ancestors {
        if ancestor_last {
            prefix.extend(std::iter::repeat_n(' ', branch.chars().count()));
        } else {
            prefix.push_str(branch);
        }
        prefix.extend(std::iter::repeat_n(' ', indent_size));
    }

    prefix.push_str(if is_last { last } else { corner });
    prefix.push(' ');
    prefix
}

impl fmt::Display for ObjectTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_all())
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time operations such as model rebuilds.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "object_outliner::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ClassId, ObjectFlags};

    fn setup() -> (ObjectRegistry, ClassId) {
        let mut registry = ObjectRegistry::new();
        let object = registry.register_class("Object", None).unwrap();
        (registry, object)
    }

    #[test]
    fn test_tree_format_empty() {
        let (registry, _) = setup();
        let output = ObjectTreeDebug::new(&registry).format_all();
        assert!(output.contains("Object Tree (0 total objects)"));
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let (mut registry, object) = setup();
        let root = registry.spawn(object, "Package", None).unwrap();
        registry.spawn(object, "first", Some(root)).unwrap();
        registry.spawn(object, "second", Some(root)).unwrap();

        let output = ObjectTreeDebug::new(&registry).format_subtree(root).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Package"));
        assert!(lines[1].starts_with("\u{251c}\u{2500}\u{2500} first"));
        assert!(lines[2].starts_with("\u{2514}\u{2500}\u{2500} second"));
    }

    #[test]
    fn test_tree_format_minimal() {
        let (mut registry, object) = setup();
        let id = registry.spawn(object, "test", None).unwrap();

        let debug = ObjectTreeDebug::with_options(&registry, TreeFormatOptions::minimal());
        let output = debug.format_subtree(id).unwrap();

        assert_eq!(output, "test\n");
    }

    #[test]
    fn test_tree_format_detailed() {
        let (mut registry, object) = setup();
        let id = registry.spawn(object, "Default__Object", None).unwrap();
        registry.set_flags(id, ObjectFlags::CLASS_DEFAULT).unwrap();
        registry.set_resource_size(id, 64).unwrap();

        let debug = ObjectTreeDebug::with_options(&registry, TreeFormatOptions::detailed());
        let output = debug.format_subtree(id).unwrap();

        assert!(output.contains("<cdo>"));
        assert!(output.contains("64B"));
    }

    #[test]
    fn test_ascii_prefix() {
        assert_eq!(build_prefix(TreeStyle::Ascii, 2, &[]), "");
        assert_eq!(build_prefix(TreeStyle::Ascii, 2, &[false]), "+-- ");
        assert_eq!(build_prefix(TreeStyle::Ascii, 2, &[false, true]), "|  `-- ");
        assert_eq!(build_prefix(TreeStyle::Ascii, 2, &[true, true]), "   `-- ");
        assert_eq!(build_prefix(TreeStyle::Ascii, 2, &[true, false, true]), "   |  `-- ");
    }

    #[test]
    fn test_tree_format_no_branch_under_last_child() {
        let (mut registry, object) = setup();
        let root = registry.spawn(object, "Package", None).unwrap();
        registry.spawn(object, "first", Some(root)).unwrap();
        let last = registry.spawn(object, "last", Some(root)).unwrap();
        registry.spawn(object, "nested", Some(last)).unwrap();

        let output = ObjectTreeDebug::new(&registry).format_subtree(root).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("\u{2514}\u{2500}\u{2500} last"));
        assert!(lines[3].starts_with("   \u{2514}\u{2500}\u{2500} nested"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
