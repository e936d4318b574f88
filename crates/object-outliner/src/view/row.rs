//! Per-row presentation data.

use object_outliner_core::{ObjectFlags, ObjectRef, ObjectRegistry};

use crate::catalog::PACKAGE_CLASS;
use crate::model::{ItemId, OutlinerTree};

/// Shown in the memory column for vanished objects.
const NO_MEMORY: &str = "-";

const IEC_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Accent a row is drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowTint {
    #[default]
    Default,
    /// Class default objects.
    ClassDefault,
    /// Packages.
    Package,
}

/// Everything a row renderer needs for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowPresentation {
    pub name: String,
    pub class_name: String,
    pub path: String,
    pub tint: RowTint,
    /// Drawn with a subdued foreground; the node is only an ancestor.
    pub subdued: bool,
    pub memory: String,
    pub tooltip: String,
    /// Current search text, for highlighting matches in name and class.
    pub highlight: String,
    /// `false` when the object no longer exists.
    pub live: bool,
}

impl RowPresentation {
    /// Builds the row for `item`. `None` if the node is unknown.
    ///
    /// A vanished object still gets a row, with empty texts and `-` memory.
    pub fn build(
        tree: &OutlinerTree,
        registry: &ObjectRegistry,
        item: ItemId,
        highlight: &str,
    ) -> Option<Self> {
        let node = tree.get(item)?;
        let subdued = !node.is_explicitly_added();

        let Some(object) = registry.get(node.object()) else {
            return Some(Self {
                subdued,
                memory: NO_MEMORY.to_string(),
                highlight: highlight.to_string(),
                ..Self::default()
            });
        };

        Some(Self {
            name: object.name().to_string(),
            class_name: object.class_name().to_string(),
            path: object.path_name(),
            tint: tint_for(object),
            subdued,
            memory: format_memory(object.resource_size()),
            tooltip: tooltip_for(object),
            highlight: highlight.to_string(),
            live: true,
        })
    }
}

fn tint_for(object: ObjectRef<'_>) -> RowTint {
    if object.has_any_flags(ObjectFlags::CLASS_DEFAULT) {
        return RowTint::ClassDefault;
    }
    let is_package = object
        .registry()
        .find_class(PACKAGE_CLASS)
        .is_some_and(|package| object.is_a(package));
    if is_package {
        RowTint::Package
    } else {
        RowTint::Default
    }
}

fn tooltip_for(object: ObjectRef<'_>) -> String {
    let mut lines = vec![
        format!("Class: {}", object.class_name()),
        format!("Package: {}", object.path_name()),
    ];
    if let Some(outer) = object.outer_ref() {
        lines.push(String::new());
        lines.push(format!(
            "Outer Class: {} Name: {}",
            outer.class_name(),
            outer.name()
        ));
    }
    lines.join("\n")
}

/// Formats a byte count with IEC units and at most one fractional digit.
///
/// ```
/// use object_outliner::view::format_memory;
///
/// assert_eq!(format_memory(512), "512 B");
/// assert_eq!(format_memory(1536), "1.5 KiB");
/// assert_eq!(format_memory(2 * 1024 * 1024), "2 MiB");
/// ```
pub fn format_memory(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < IEC_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    // Rounding to one digit can reach the next unit.
    if (value * 10.0).round() >= 10240.0 && unit + 1 < IEC_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text} {}", IEC_UNITS[unit])
}
