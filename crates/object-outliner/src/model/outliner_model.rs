//! The outliner model: population scan, filtering and content building.
//!
//! Each [`OutlinerModel::update_content`] call discards the previous content,
//! walks the whole population once and rebuilds either a flat list of the
//! objects that passed both filter stages, or the ownership tree that
//! contains them.
//!
//! # Example
//!
//! ```
//! use object_outliner::model::{DisplayMode, OutlinerModel};
//! use object_outliner_core::ObjectRegistry;
//!
//! let mut registry = ObjectRegistry::new();
//! let object = registry.register_class("Object", None).unwrap();
//! let package = registry.spawn(object, "/Game/Map", None).unwrap();
//! registry.spawn(object, "Actor_0", Some(package)).unwrap();
//!
//! let mut model = OutlinerModel::new();
//! model.set_structural_filter(|obj| obj.name().starts_with("Actor"));
//!
//! let counts = model.update_content(&registry, DisplayMode::Tree, None);
//! assert_eq!(counts.discovered, 2);
//! assert_eq!(counts.filtered, 1);
//! assert_eq!(model.tree().len(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use object_outliner_core::logging::{span_names, targets, PerfSpan};
use object_outliner_core::{ObjectId, ObjectRef, ObjectRegistry, Signal};

use super::item::{ItemId, OutlinerTree};
use super::sort::{sort_items, SortColumn, SortMode};

/// Predicate bound into the model for one filter stage.
pub type ObjectFilterFn = Arc<dyn Fn(ObjectRef<'_>) -> bool + Send + Sync>;

/// How content is arranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Every passing object is a root.
    #[default]
    List,
    /// Passing objects are grouped under their outer chain.
    Tree,
}

impl DisplayMode {
    /// Parses the persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list" => Some(Self::List),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }

    /// The persisted name.
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Tree => "tree",
        }
    }

    /// Returns `true` for [`DisplayMode::Tree`].
    pub fn is_hierarchical(self) -> bool {
        self == Self::Tree
    }
}

/// Counters of one rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentCounts {
    /// Objects seen by the scan.
    pub discovered: usize,
    /// Objects that passed the structural filter.
    pub filtered: usize,
    /// Length of the root content.
    pub displayed: usize,
}

/// Owns the current content and the bound filter stages.
pub struct OutlinerModel {
    tree: OutlinerTree,
    mode: DisplayMode,
    counts: ContentCounts,
    structural_filter: Option<ObjectFilterFn>,
    text_filter: Option<ObjectFilterFn>,
    /// Emitted with the counters after every rebuild.
    content_updated: Signal<ContentCounts>,
}

impl Default for OutlinerModel {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlinerModel {
    /// Creates an empty model with no filter stages bound.
    pub fn new() -> Self {
        Self {
            tree: OutlinerTree::new(),
            mode: DisplayMode::default(),
            counts: ContentCounts::default(),
            structural_filter: None,
            text_filter: None,
            content_updated: Signal::new(),
        }
    }

    // =========================================================================
    // Filter stages
    // =========================================================================

    /// Binds the structural filter stage.
    pub fn set_structural_filter<F>(&mut self, filter: F)
    where
        F: Fn(ObjectRef<'_>) -> bool + Send + Sync + 'static,
    {
        self.structural_filter = Some(Arc::new(filter));
    }

    /// Unbinds the structural filter stage; everything passes it.
    pub fn clear_structural_filter(&mut self) {
        self.structural_filter = None;
    }

    /// Binds the text filter stage.
    pub fn set_text_filter<F>(&mut self, filter: F)
    where
        F: Fn(ObjectRef<'_>) -> bool + Send + Sync + 'static,
    {
        self.text_filter = Some(Arc::new(filter));
    }

    /// Unbinds the text filter stage; everything passes it.
    pub fn clear_text_filter(&mut self) {
        self.text_filter = None;
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Rebuilds the content from a full scan of `registry`.
    ///
    /// When `processed` is given it is cleared and then filled with the
    /// identity map of the new content.
    #[tracing::instrument(skip(self, registry, processed), target = "object_outliner::model", level = "trace")]
    pub fn update_content(
        &mut self,
        registry: &ObjectRegistry,
        mode: DisplayMode,
        processed: Option<&mut HashMap<ObjectId, ItemId>>,
    ) -> ContentCounts {
        let _span = PerfSpan::new(span_names::UPDATE_CONTENT);

        self.tree.clear();
        self.mode = mode;
        let mut counts = ContentCounts::default();
        let mut passed = Vec::new();

        for object in registry.iter() {
            counts.discovered += 1;

            if let Some(filter) = &self.structural_filter
                && !filter(object)
            {
                continue;
            }
            counts.filtered += 1;

            if let Some(filter) = &self.text_filter
                && !filter(object)
            {
                continue;
            }

            match mode {
                DisplayMode::List => {
                    self.tree.add_root(object.id(), true);
                }
                DisplayMode::Tree => passed.push(object.id()),
            }
        }

        for id in passed {
            self.insert(registry, id);
        }

        counts.displayed = self.tree.roots().len();
        self.counts = counts;

        if let Some(processed) = processed {
            processed.clear();
            processed.extend(self.tree.identity_map().iter().map(|(&k, &v)| (k, v)));
        }

        tracing::debug!(
            target: targets::MODEL,
            mode = mode.name(),
            discovered = counts.discovered,
            filtered = counts.filtered,
            displayed = counts.displayed,
            nodes = self.tree.len(),
            "content updated"
        );
        self.content_updated.emit(counts);
        counts
    }

    /// Inserts `object` with its whole outer chain, reusing nodes already in
    /// the tree. Returns the object's node.
    ///
    /// Ancestors are created implicit; the object itself is (or is upgraded
    /// to) explicit. A cycle in the outer chain is logged and the object is
    /// skipped.
    fn insert(&mut self, registry: &ObjectRegistry, object: ObjectId) -> Option<ItemId> {
        if let Some(existing) = self.tree.item_for(object) {
            self.tree.mark_explicit(existing);
            return Some(existing);
        }

        // Walk up until an object that already has a node, or a root.
        let mut chain = vec![object];
        let mut seen = HashSet::from([object]);
        let mut parent = None;
        let mut current = object;
        while let Some(outer) = registry.get(current).and_then(|o| o.outer()) {
            if let Some(existing) = self.tree.item_for(outer) {
                parent = Some(existing);
                break;
            }
            // `set_outer` rejects cycles, so this only trips on a corrupted registry.
            if !seen.insert(outer) {
                debug_assert!(false, "object is its own ancestor");
                tracing::warn!(target: targets::MODEL, ?object, ?outer, "cycle in outer chain, skipping object");
                return None;
            }
            chain.push(outer);
            current = outer;
        }

        // Materialize from the topmost missing ancestor down.
        let mut node = None;
        for (depth, &id) in chain.iter().enumerate().rev() {
            let explicitly_added = depth == 0;
            let created = match parent {
                Some(parent) => self.tree.add_child(parent, id, explicitly_added),
                None => self.tree.add_root(id, explicitly_added),
            };
            parent = Some(created);
            node = Some(created);
        }
        node
    }

    /// The current content.
    pub fn tree(&self) -> &OutlinerTree {
        &self.tree
    }

    /// Root content in display order.
    pub fn root_items(&self) -> &[ItemId] {
        self.tree.roots()
    }

    /// Mode of the last rebuild.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Counters of the last rebuild.
    pub fn counts(&self) -> ContentCounts {
        self.counts
    }

    /// The signal emitted after every rebuild.
    pub fn content_updated(&self) -> &Signal<ContentCounts> {
        &self.content_updated
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sorts the root content.
    pub fn sort_roots(&mut self, registry: &ObjectRegistry, column: SortColumn, mode: SortMode) {
        let _span = PerfSpan::new(span_names::SORT);
        self.tree.reorder_roots(|tree, ids| sort_items(tree, registry, ids, column, mode));
    }

    /// Returns the children of `item`, sorting them first if they are dirty.
    pub fn sorted_children(
        &mut self,
        registry: &ObjectRegistry,
        item: ItemId,
        column: SortColumn,
        mode: SortMode,
    ) -> &[ItemId] {
        let dirty = self.tree.get(item).is_some_and(|i| i.children_require_sort());
        if dirty {
            tracing::trace!(target: targets::MODEL, ?item, "sorting children");
            self.tree
                .reorder_children(item, |tree, ids| sort_items(tree, registry, ids, column, mode));
        }
        self.tree.children(item)
    }
}

static_assertions::assert_impl_all!(OutlinerModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        registry: ObjectRegistry,
        package: ObjectId,
        level: ObjectId,
        actor_a: ObjectId,
        actor_b: ObjectId,
        texture: ObjectId,
    }

    fn setup() -> Fixture {
        let mut registry = ObjectRegistry::new();
        let object = registry.register_class("Object", None).unwrap();
        let actor_class = registry.register_class("Actor", Some(object)).unwrap();
        let package = registry.spawn(object, "/Game/Map", None).unwrap();
        let level = registry.spawn(object, "PersistentLevel", Some(package)).unwrap();
        let actor_a = registry.spawn(actor_class, "Actor_A", Some(level)).unwrap();
        let actor_b = registry.spawn(actor_class, "Actor_B", Some(level)).unwrap();
        let texture = registry.spawn(object, "T_Rock", None).unwrap();
        Fixture {
            registry,
            package,
            level,
            actor_a,
            actor_b,
            texture,
        }
    }

    fn actors_only(model: &mut OutlinerModel) {
        model.set_structural_filter(|obj| obj.class_name() == "Actor");
    }

    #[test]
    fn test_display_mode_names() {
        assert_eq!(DisplayMode::from_name("tree"), Some(DisplayMode::Tree));
        assert_eq!(DisplayMode::from_name(DisplayMode::List.name()), Some(DisplayMode::List));
        assert_eq!(DisplayMode::from_name("grid"), None);
        assert!(DisplayMode::Tree.is_hierarchical());
    }

    #[test]
    fn test_unfiltered_list() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        let counts = model.update_content(&fx.registry, DisplayMode::List, None);

        assert_eq!(counts, ContentCounts { discovered: 5, filtered: 5, displayed: 5 });
        assert!(model.tree().iter().all(|(_, item)| item.is_explicitly_added()));
    }

    #[test]
    fn test_counters_per_stage() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        actors_only(&mut model);
        model.set_text_filter(|obj| obj.name().ends_with('B'));

        let counts = model.update_content(&fx.registry, DisplayMode::List, None);
        assert_eq!(counts, ContentCounts { discovered: 5, filtered: 2, displayed: 1 });

        model.clear_text_filter();
        model.clear_structural_filter();
        assert_eq!(model.update_content(&fx.registry, DisplayMode::List, None).displayed, 5);
    }

    #[test]
    fn test_tree_shares_ancestors() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        actors_only(&mut model);
        let counts = model.update_content(&fx.registry, DisplayMode::Tree, None);

        let tree = model.tree();
        assert_eq!(counts.displayed, 1);
        assert_eq!(tree.len(), 4);
        assert!(tree.is_consistent());

        let package = tree.item_for(fx.package).unwrap();
        let level = tree.item_for(fx.level).unwrap();
        assert_eq!(tree.roots(), &[package]);
        assert_eq!(tree.children(package), &[level]);
        assert_eq!(tree.children(level).len(), 2);
        assert!(!tree.get(package).unwrap().is_explicitly_added());
        assert!(!tree.get(level).unwrap().is_explicitly_added());
        assert!(tree.get(tree.item_for(fx.actor_a).unwrap()).unwrap().is_explicitly_added());
        assert!(tree.item_for(fx.texture).is_none());
    }

    #[test]
    fn test_ancestor_upgraded_when_it_passes() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        let level = fx.level;
        let actor_b = fx.actor_b;
        model.set_structural_filter(move |obj| obj.id() == level || obj.id() == actor_b);
        model.update_content(&fx.registry, DisplayMode::Tree, None);

        let tree = model.tree();
        assert!(tree.get(tree.item_for(fx.level).unwrap()).unwrap().is_explicitly_added());
        assert!(!tree.get(tree.item_for(fx.package).unwrap()).unwrap().is_explicitly_added());
        assert_eq!(tree.explicit_count(), 2);
    }

    #[test]
    fn test_processed_map_is_replaced() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        let mut processed = HashMap::new();
        model.update_content(&fx.registry, DisplayMode::List, Some(&mut processed));
        assert_eq!(processed.len(), 5);

        actors_only(&mut model);
        model.update_content(&fx.registry, DisplayMode::List, Some(&mut processed));
        assert_eq!(processed.len(), 2);
        assert!(processed.contains_key(&fx.actor_a));
        assert!(!processed.contains_key(&fx.texture));
    }

    #[test]
    fn test_lazy_child_sort() {
        let mut fx = setup();
        fx.registry.rename(fx.actor_a, "Zulu").unwrap();
        let mut model = OutlinerModel::new();
        actors_only(&mut model);
        model.update_content(&fx.registry, DisplayMode::Tree, None);
        model.sort_roots(&fx.registry, SortColumn::Name, SortMode::Ascending);

        let level = model.tree().item_for(fx.level).unwrap();
        assert!(model.tree().get(level).unwrap().children_require_sort());

        let children = model
            .sorted_children(&fx.registry, level, SortColumn::Name, SortMode::Ascending)
            .to_vec();
        let names: Vec<&str> = children
            .iter()
            .map(|&id| fx.registry.get(model.tree().get(id).unwrap().object()).unwrap().name())
            .collect();
        assert_eq!(names, ["Actor_B", "Zulu"]);
        assert!(!model.tree().get(level).unwrap().children_require_sort());
    }

    #[test]
    fn test_content_updated_emits_counts() {
        let fx = setup();
        let mut model = OutlinerModel::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        model.content_updated().connect(move |counts: &ContentCounts| {
            seen_clone.store(counts.discovered, Ordering::SeqCst);
        });

        model.update_content(&fx.registry, DisplayMode::List, None);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }
}
