//! Outliner nodes and the arena that owns them.
//!
//! Nodes live in an [`OutlinerTree`] arena and refer to each other by
//! [`ItemId`]. A node's parent link is a plain back-reference resolved only
//! for traversal; ownership flows strictly from the arena. The subject object
//! is held as an [`ObjectId`], so a node never keeps its object alive.

use std::collections::HashMap;
use std::fmt::Write as _;

use object_outliner_core::logging::{build_prefix, TreeStyle};
use object_outliner_core::{ObjectId, ObjectRegistry};

/// Index of a node within one [`OutlinerTree`].
///
/// Only meaningful for the tree (and rebuild) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node wrapping a discovered object.
#[derive(Debug, Clone)]
pub struct OutlinerItem {
    object: ObjectId,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    explicitly_added: bool,
    children_require_sort: bool,
}

impl OutlinerItem {
    fn new(object: ObjectId, explicitly_added: bool) -> Self {
        Self {
            object,
            parent: None,
            children: Vec::new(),
            explicitly_added,
            children_require_sort: true,
        }
    }

    /// The subject object. May no longer resolve.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// The parent node, if any.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Child nodes in their current order.
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// `true` if the object itself passed the filters; `false` if it is only
    /// present as the ancestor of one that did.
    pub fn is_explicitly_added(&self) -> bool {
        self.explicitly_added
    }

    /// `true` if the children must be re-sorted before they are next shown.
    pub fn children_require_sort(&self) -> bool {
        self.children_require_sort
    }
}

/// Arena of outliner nodes plus the content roots and an identity lookup.
#[derive(Debug, Clone, Default)]
pub struct OutlinerTree {
    items: Vec<OutlinerItem>,
    roots: Vec<ItemId>,
    by_object: HashMap<ObjectId, ItemId>,
}

impl OutlinerTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.items.clear();
        self.roots.clear();
        self.by_object.clear();
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn push(&mut self, object: ObjectId, explicitly_added: bool) -> ItemId {
        debug_assert!(
            !self.by_object.contains_key(&object),
            "object inserted twice in one rebuild"
        );
        let id = ItemId(self.items.len());
        self.items.push(OutlinerItem::new(object, explicitly_added));
        self.by_object.insert(object, id);
        id
    }

    /// Appends a new root node for `object`.
    pub(crate) fn add_root(&mut self, object: ObjectId, explicitly_added: bool) -> ItemId {
        let id = self.push(object, explicitly_added);
        self.roots.push(id);
        id
    }

    /// Attaches a new node for `object` under `parent` and marks the parent's
    /// children for re-sorting.
    pub(crate) fn add_child(
        &mut self,
        parent: ItemId,
        object: ObjectId,
        explicitly_added: bool,
    ) -> ItemId {
        let id = self.push(object, explicitly_added);
        self.items[id.0].parent = Some(parent);
        let parent_item = &mut self.items[parent.0];
        parent_item.children.push(id);
        parent_item.children_require_sort = true;
        id
    }

    /// Upgrades a node to explicitly added. Never downgrades.
    pub(crate) fn mark_explicit(&mut self, id: ItemId) {
        if let Some(item) = self.items.get_mut(id.0) {
            item.explicitly_added = true;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Looks up a node.
    pub fn get(&self, id: ItemId) -> Option<&OutlinerItem> {
        self.items.get(id.0)
    }

    /// The node built for `object` in this rebuild, if any.
    pub fn item_for(&self, object: ObjectId) -> Option<ItemId> {
        self.by_object.get(&object).copied()
    }

    /// The identity map of this rebuild.
    pub fn identity_map(&self) -> &HashMap<ObjectId, ItemId> {
        &self.by_object
    }

    /// Root content in display order.
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Children of a node, empty for unknown ids.
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.get(id).map(OutlinerItem::children).unwrap_or_default()
    }

    /// Parent of a node.
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).and_then(OutlinerItem::parent)
    }

    /// Walks from the node's parent up to its root.
    pub fn ancestors(&self, id: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Number of ancestors above a node.
    pub fn depth(&self, id: ItemId) -> usize {
        self.ancestors(id).count()
    }

    /// Iterates every node with its id, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &OutlinerItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes whose object passed the filters itself.
    pub fn explicit_count(&self) -> usize {
        self.items.iter().filter(|item| item.explicitly_added).count()
    }

    /// Checks that parent links and child lists agree and every node is
    /// reachable exactly once from the roots.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.items.len()];
        let mut stack: Vec<(ItemId, Option<ItemId>)> =
            self.roots.iter().rev().map(|&id| (id, None)).collect();

        while let Some((id, expected_parent)) = stack.pop() {
            let Some(item) = self.get(id) else {
                return false;
            };
            if seen[id.0] || item.parent != expected_parent {
                return false;
            }
            seen[id.0] = true;
            stack.extend(item.children.iter().rev().map(|&child| (child, Some(id))));
        }

        seen.into_iter().all(|s| s)
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Reorders root content with `sort`, then flags every root's children
    /// for re-sorting.
    pub(crate) fn reorder_roots(&mut self, sort: impl FnOnce(&Self, &mut Vec<ItemId>)) {
        let mut roots = std::mem::take(&mut self.roots);
        sort(self, &mut roots);
        for &id in &roots {
            self.items[id.0].children_require_sort = true;
        }
        self.roots = roots;
    }

    /// Reorders a node's children with `sort`, flags each child's own children
    /// for re-sorting and clears the node's flag.
    pub(crate) fn reorder_children(&mut self, id: ItemId, sort: impl FnOnce(&Self, &mut Vec<ItemId>)) {
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        let mut children = std::mem::take(&mut item.children);
        sort(self, &mut children);
        for &child in &children {
            self.items[child.0].children_require_sort = true;
        }
        let item = &mut self.items[id.0];
        item.children = children;
        item.children_require_sort = false;
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// Renders the tree, one node per line. Implicit nodes are wrapped in
    /// parentheses and vanished objects show as `<gone>`.
    pub fn dump(&self, registry: &ObjectRegistry) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            self.dump_into(registry, root, &mut Vec::new(), &mut output);
        }
        output
    }

    fn dump_into(
        &self,
        registry: &ObjectRegistry,
        id: ItemId,
        lineage: &mut Vec<bool>,
        output: &mut String,
    ) {
        let Some(item) = self.get(id) else {
            return;
        };

        output.push_str(&build_prefix(TreeStyle::Unicode, 2, lineage));
        let name = registry.get(item.object).map(|o| o.name()).unwrap_or("<gone>");
        if item.explicitly_added {
            output.push_str(name);
        } else {
            let _ = write!(output, "({name})");
        }
        output.push('\n');

        let count = item.children.len();
        for (i, &child) in item.children.iter().enumerate() {
            lineage.push(i + 1 == count);
            self.dump_into(registry, child, lineage, output);
            lineage.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects(n: usize) -> (ObjectRegistry, Vec<ObjectId>) {
        let mut registry = ObjectRegistry::new();
        let class = registry.register_class("Object", None).unwrap();
        let ids = (0..n)
            .map(|i| registry.spawn(class, format!("Obj{i}"), None).unwrap())
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_child_links_are_consistent() {
        let (_, ids) = objects(3);
        let mut tree = OutlinerTree::new();
        let root = tree.add_root(ids[0], false);
        let middle = tree.add_child(root, ids[1], false);
        let leaf = tree.add_child(middle, ids[2], true);

        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.children(root), &[middle]);
        assert_eq!(tree.parent(leaf), Some(middle));
        assert_eq!(tree.ancestors(leaf).collect::<Vec<_>>(), vec![middle, root]);
        assert_eq!(tree.depth(leaf), 2);
        assert_eq!(tree.item_for(ids[2]), Some(leaf));
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_add_child_marks_parent_dirty() {
        let (_, ids) = objects(2);
        let mut tree = OutlinerTree::new();
        let root = tree.add_root(ids[0], true);
        tree.reorder_children(root, |_, _| {});
        assert!(!tree.get(root).unwrap().children_require_sort());

        tree.add_child(root, ids[1], true);
        assert!(tree.get(root).unwrap().children_require_sort());
    }

    #[test]
    fn test_mark_explicit_upgrades() {
        let (_, ids) = objects(1);
        let mut tree = OutlinerTree::new();
        let root = tree.add_root(ids[0], false);
        assert_eq!(tree.explicit_count(), 0);

        tree.mark_explicit(root);
        assert!(tree.get(root).unwrap().is_explicitly_added());
        assert_eq!(tree.explicit_count(), 1);
    }

    #[test]
    fn test_reorder_roots_flags_children() {
        let (_, ids) = objects(2);
        let mut tree = OutlinerTree::new();
        let a = tree.add_root(ids[0], true);
        let b = tree.add_root(ids[1], true);
        tree.reorder_children(a, |_, _| {});
        tree.reorder_children(b, |_, _| {});

        tree.reorder_roots(|_, roots| roots.reverse());

        assert_eq!(tree.roots(), &[b, a]);
        assert!(tree.get(a).unwrap().children_require_sort());
        assert!(tree.get(b).unwrap().children_require_sort());
    }

    #[test]
    fn test_dump_marks_implicit_nodes() {
        let (registry, ids) = objects(3);
        let mut tree = OutlinerTree::new();
        let root = tree.add_root(ids[0], true);
        let middle = tree.add_child(root, ids[1], false);
        tree.add_child(middle, ids[2], true);

        let dump = tree.dump(&registry);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "Obj0");
        assert_eq!(lines[1], "\u{2514}\u{2500}\u{2500} (Obj1)");
        assert_eq!(lines[2], "   \u{2514}\u{2500}\u{2500} Obj2");
    }

    #[test]
    fn test_dump_keeps_branch_under_non_last_child() {
        let (registry, ids) = objects(4);
        let mut tree = OutlinerTree::new();
        let root = tree.add_root(ids[0], true);
        let first = tree.add_child(root, ids[1], true);
        tree.add_child(root, ids[2], true);
        tree.add_child(first, ids[3], true);

        let dump = tree.dump(&registry);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[1], "\u{251c}\u{2500}\u{2500} Obj1");
        assert_eq!(lines[2], "\u{2502}  \u{2514}\u{2500}\u{2500} Obj3");
        assert_eq!(lines[3], "\u{2514}\u{2500}\u{2500} Obj2");
    }

    #[test]
    fn test_clear() {
        let (_, ids) = objects(1);
        let mut tree = OutlinerTree::new();
        tree.add_root(ids[0], true);
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
        assert!(tree.item_for(ids[0]).is_none());
    }
}
