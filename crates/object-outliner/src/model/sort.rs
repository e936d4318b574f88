//! Column sorting for outliner content.
//!
//! Sorting is a stable single-column compare. Name and class compare
//! case-insensitively, memory compares the resource size. Nodes whose object
//! has vanished compare equal to each other and always sort after live
//! ones, in either direction.

use std::cmp::Ordering;

use object_outliner_core::{ObjectRef, ObjectRegistry};

use super::item::{ItemId, OutlinerTree};

/// The column content is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// Object name.
    #[default]
    Name,
    /// Runtime class name.
    Class,
    /// Reported resource size.
    Memory,
}

impl SortColumn {
    /// Every column, in display order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Class, Self::Memory];

    /// Parses the persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "class" => Some(Self::Class),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    /// The persisted name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Class => "class",
            Self::Memory => "memory",
        }
    }

    /// Column header text.
    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Class => "Class",
            Self::Memory => "Memory",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    #[default]
    Ascending,
    Descending,
}

impl SortMode {
    /// Parses the persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// The persisted name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Compares two live objects by `column`, ascending.
pub fn compare_objects(a: ObjectRef<'_>, b: ObjectRef<'_>, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => compare_ignore_case(a.name(), b.name()),
        SortColumn::Class => compare_ignore_case(a.class_name(), b.class_name()),
        SortColumn::Memory => a.resource_size().cmp(&b.resource_size()),
    }
}

/// Compares two possibly vanished objects by `column` in direction `mode`.
///
/// Vanished objects sort last regardless of `mode`.
pub fn compare(
    a: Option<ObjectRef<'_>>,
    b: Option<ObjectRef<'_>>,
    column: SortColumn,
    mode: SortMode,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = compare_objects(a, b, column);
            match mode {
                SortMode::Ascending => ordering,
                SortMode::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sorts `ids` by their objects.
pub fn sort_items(
    tree: &OutlinerTree,
    registry: &ObjectRegistry,
    ids: &mut [ItemId],
    column: SortColumn,
    mode: SortMode,
) {
    let resolve = |id: ItemId| {
        tree.get(id)
            .and_then(|item| registry.get(item.object()))
    };
    ids.sort_by(|&a, &b| compare(resolve(a), resolve(b), column, mode));
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
