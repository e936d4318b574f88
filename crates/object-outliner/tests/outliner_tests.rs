//! End-to-end behavior of the outliner model and view.

use std::collections::HashSet;
use std::sync::Arc;

use object_outliner::catalog::register_engine_classes;
use object_outliner::config::Settings;
use object_outliner::model::{
    DisplayMode, Filter, FilterSet, OutlinerModel, OutlinerTree, SortColumn, SortMode,
};
use object_outliner::view::OutlinerView;
use object_outliner_core::{ObjectFlags, ObjectId, ObjectRegistry, SharedObjectRegistry};

struct World {
    registry: Arc<SharedObjectRegistry>,
    map: ObjectId,
    level: ObjectId,
    hero: ObjectId,
    door: ObjectId,
    rock_package: ObjectId,
    rock: ObjectId,
}

fn setup() -> World {
    let registry = Arc::new(SharedObjectRegistry::new());
    registry.with_write(register_engine_classes).unwrap();
    let class = |name: &str| registry.with_read(|r| r.find_class(name)).unwrap();

    let map = registry.spawn(class("Package"), "/Game/Map", None).unwrap();
    let level = registry.spawn(class("Level"), "PersistentLevel", Some(map)).unwrap();
    let hero = registry.spawn(class("Pawn"), "Hero", Some(level)).unwrap();
    let door = registry.spawn(class("Actor"), "Door", Some(level)).unwrap();
    let rock_package = registry.spawn(class("Package"), "/Game/Rock", None).unwrap();
    let rock = registry
        .spawn(class("Texture2D"), "T_Rock", Some(rock_package))
        .unwrap();
    let cdo = registry.spawn(class("Actor"), "Default__Actor", None).unwrap();
    registry
        .with_write(|r| r.set_flags(cdo, ObjectFlags::CLASS_DEFAULT))
        .unwrap();

    World {
        registry,
        map,
        level,
        hero,
        door,
        rock_package,
        rock,
    }
}

fn open_view(world: &World) -> OutlinerView {
    OutlinerView::new(world.registry.clone(), Arc::new(Settings::new())).unwrap()
}

fn root_objects(tree: &OutlinerTree) -> Vec<ObjectId> {
    tree.roots()
        .iter()
        .map(|&id| tree.get(id).unwrap().object())
        .collect()
}

fn explicit_objects(tree: &OutlinerTree) -> HashSet<ObjectId> {
    tree.iter()
        .filter(|(_, item)| item.is_explicitly_added())
        .map(|(_, item)| item.object())
        .collect()
}

// ============================================================================
// Rebuilds
// ============================================================================

#[test]
fn test_update_content_is_idempotent() {
    let world = setup();
    let mut model = OutlinerModel::new();
    model.set_structural_filter(|obj| obj.name() != "Door");

    world.registry.with_read(|registry| {
        let first_counts = model.update_content(registry, DisplayMode::Tree, None);
        model.sort_roots(registry, SortColumn::Name, SortMode::Ascending);
        let first_roots = root_objects(model.tree());
        let first_dump = model.tree().dump(registry);

        let second_counts = model.update_content(registry, DisplayMode::Tree, None);
        model.sort_roots(registry, SortColumn::Name, SortMode::Ascending);

        assert_eq!(first_counts, second_counts);
        assert_eq!(first_roots, root_objects(model.tree()));
        assert_eq!(first_dump, model.tree().dump(registry));
    });
}

#[test]
fn test_view_refresh_is_idempotent() {
    let world = setup();
    let mut view = open_view(&world);
    view.set_display_mode(DisplayMode::Tree);
    let before = (view.counts(), root_objects(view.model().tree()));

    view.refresh();

    assert_eq!(before, (view.counts(), root_objects(view.model().tree())));
}

// ============================================================================
// Filter policy
// ============================================================================

#[test]
fn test_first_disabled_match_skips_despite_later_enabled_match() {
    let world = setup();
    let (pawn, actor) = world.registry.with_read(|r| {
        (r.find_class("Pawn").unwrap(), r.find_class("Actor").unwrap())
    });

    let imperative = world.registry.with_read(|registry| {
        FilterSet::from_filters([
            Filter::for_classes("Filter_Pawn", "Pawns", [pawn], registry),
            Filter::for_classes("Filter_Actor", "Actors", [actor], registry).with_enabled(true),
        ])
        .unwrap()
    });
    let view = OutlinerView::with_filters(
        world.registry.clone(),
        Arc::new(Settings::new()),
        imperative,
        FilterSet::new(),
    );

    let shown = root_objects(view.model().tree());
    assert!(!shown.contains(&world.hero));
    assert!(shown.contains(&world.door));
}

// ============================================================================
// Tree construction
// ============================================================================

#[test]
fn test_ancestor_only_node_is_shared_and_implicit() {
    let mut registry = ObjectRegistry::new();
    let object = registry.register_class("Object", None).unwrap();
    let grandparent = registry.spawn(object, "Grandparent", None).unwrap();
    let parent = registry.spawn(object, "Parent", Some(grandparent)).unwrap();
    let child = registry.spawn(object, "Child", Some(parent)).unwrap();
    let sibling = registry.spawn(object, "Sibling", Some(parent)).unwrap();

    let mut model = OutlinerModel::new();
    model.set_structural_filter(move |obj| obj.id() != parent);
    model.update_content(&registry, DisplayMode::Tree, None);

    let tree = model.tree();
    assert_eq!(tree.len(), 4);
    assert!(tree.is_consistent());

    let gp_item = tree.item_for(grandparent).unwrap();
    let parent_item = tree.item_for(parent).unwrap();
    let child_item = tree.item_for(child).unwrap();
    let sibling_item = tree.item_for(sibling).unwrap();

    assert_eq!(tree.roots(), &[gp_item]);
    assert_eq!(tree.children(gp_item), &[parent_item]);
    assert_eq!(tree.parent(child_item), Some(parent_item));
    assert_eq!(tree.parent(sibling_item), Some(parent_item));

    assert!(tree.get(gp_item).unwrap().is_explicitly_added());
    assert!(!tree.get(parent_item).unwrap().is_explicitly_added());
    assert!(tree.get(child_item).unwrap().is_explicitly_added());
}

#[test]
fn test_flat_and_tree_pass_the_same_objects() {
    let world = setup();
    let mut view = open_view(&world);

    let configurations: [fn(&mut OutlinerView); 4] = [
        |_| {},
        |view| {
            view.toggle_drop_down_filter("Filter_Textures").unwrap();
        },
        |view| {
            view.toggle_all_drop_down_filters();
        },
        |view| {
            view.set_search_text("o");
        },
    ];

    for configure in configurations {
        configure(&mut view);

        view.set_display_mode(DisplayMode::List);
        let flat: HashSet<ObjectId> = root_objects(view.model().tree()).into_iter().collect();
        let flat_count = view.counts().displayed;

        view.set_display_mode(DisplayMode::Tree);
        let explicit = explicit_objects(view.model().tree());

        assert_eq!(flat_count, explicit.len());
        assert_eq!(flat, explicit);
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sort_keeps_tied_items_in_scan_order() {
    let mut registry = ObjectRegistry::new();
    let object = registry.register_class("Object", None).unwrap();
    let tied: Vec<ObjectId> = (0..4)
        .map(|_| registry.spawn(object, "Same", None).unwrap())
        .collect();
    registry.spawn(object, "Alpha", None).unwrap();
    registry.spawn(object, "Zulu", None).unwrap();

    let mut model = OutlinerModel::new();
    model.update_content(&registry, DisplayMode::List, None);
    let scanned: Vec<ObjectId> = root_objects(model.tree())
        .into_iter()
        .filter(|id| tied.contains(id))
        .collect();

    for mode in [SortMode::Ascending, SortMode::Descending] {
        model.sort_roots(&registry, SortColumn::Name, mode);
        let sorted: Vec<ObjectId> = root_objects(model.tree())
            .into_iter()
            .filter(|id| tied.contains(id))
            .collect();
        assert_eq!(sorted, scanned);

        model.update_content(&registry, DisplayMode::List, None);
    }
}

#[test]
fn test_sort_by_memory_descending() {
    let world = setup();
    world
        .registry
        .with_write(|r| {
            r.set_resource_size(world.hero, 64)?;
            r.set_resource_size(world.door, 4096)
        })
        .unwrap();

    let mut view = open_view(&world);
    view.sort_by(SortColumn::Memory, SortMode::Descending);

    let shown = root_objects(view.model().tree());
    assert_eq!(shown.first(), Some(&world.door));
    assert_eq!(view.sort_column(), SortColumn::Memory);
}

// ============================================================================
// State restoration
// ============================================================================

#[test]
fn test_selection_and_expansion_survive_unrelated_toggle() {
    let world = setup();
    let mut view = open_view(&world);
    view.set_display_mode(DisplayMode::Tree);

    let tree = view.model().tree();
    let map = tree.item_for(world.map).unwrap();
    let level = tree.item_for(world.level).unwrap();
    let hero = tree.item_for(world.hero).unwrap();
    view.select(Some(hero));
    view.set_expansion(map, true);
    view.set_expansion(level, true);

    view.toggle_drop_down_filter("Filter_Textures").unwrap();

    assert_eq!(view.selected_object(), Some(world.hero));
    let tree = view.model().tree();
    assert!(view.is_expanded(tree.item_for(world.map).unwrap()));
    assert!(view.is_expanded(tree.item_for(world.level).unwrap()));
    // The newly shown texture package starts collapsed.
    assert!(!view.is_expanded(tree.item_for(world.rock_package).unwrap()));
    assert!(tree.item_for(world.rock).is_some());
}

#[test]
fn test_vanished_selection_is_dropped() {
    let world = setup();
    let mut view = open_view(&world);
    assert!(view.select_object(world.door));
    let displayed = view.counts().displayed;

    world.registry.destroy(world.door).unwrap();
    view.refresh();

    assert_eq!(view.selected_item(), None);
    assert_eq!(view.selected_object(), None);
    assert_eq!(view.counts().displayed, displayed - 1);
}

#[test]
fn test_filtered_out_selection_is_dropped() {
    let world = setup();
    let mut view = open_view(&world);
    assert!(view.select_object(world.hero));

    view.set_search_text("door");

    assert_eq!(view.selected_object(), None);
    assert_eq!(view.counts().displayed, 1);
}
