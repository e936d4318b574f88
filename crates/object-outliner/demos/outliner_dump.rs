//! Outliner Dump Example
//!
//! Builds a small engine-like object population, runs the outliner over it
//! in list and tree mode and prints the resulting rows.
//!
//! Run with: cargo run -p object-outliner --example outliner_dump
//!
//! Set `RUST_LOG=object_outliner=debug` to see rebuild counters.

use std::sync::Arc;

use object_outliner::catalog::{register_engine_classes, spawn_transient_package};
use object_outliner::config::{default_settings_path, Settings};
use object_outliner::model::{DisplayMode, ItemId, SortColumn, SortMode};
use object_outliner::view::OutlinerView;
use object_outliner_core::{ObjectFlags, ObjectRegistry, ObjectTreeDebug, SharedObjectRegistry};
use tracing_subscriber::EnvFilter;

fn build_population() -> Result<ObjectRegistry, Box<dyn std::error::Error>> {
    let mut registry = ObjectRegistry::new();
    register_engine_classes(&mut registry)?;
    let class = |registry: &ObjectRegistry, name: &str| {
        registry
            .find_class(name)
            .ok_or_else(|| format!("class {name} is not registered"))
    };

    let package = class(&registry, "Package")?;
    let level = class(&registry, "Level")?;
    let actor = class(&registry, "Actor")?;
    let pawn = class(&registry, "Pawn")?;
    let texture = class(&registry, "Texture2D")?;
    let material = class(&registry, "Material")?;

    let map = registry.spawn(package, "/Game/Maps/Arena", None)?;
    let persistent = registry.spawn(level, "PersistentLevel", Some(map))?;
    for i in 0..3 {
        let id = registry.spawn(actor, format!("Crate_{i}"), Some(persistent))?;
        registry.set_resource_size(id, 2048 * (i + 1))?;
    }
    registry.spawn(pawn, "PlayerPawn", Some(persistent))?;

    let rock_package = registry.spawn(package, "/Game/Textures/T_Rock", None)?;
    let rock = registry.spawn(texture, "T_Rock", Some(rock_package))?;
    registry.set_resource_size(rock, 4 * 1024 * 1024)?;
    let material_package = registry.spawn(package, "/Game/Materials/M_Rock", None)?;
    registry.spawn(material, "M_Rock", Some(material_package))?;

    let transient = spawn_transient_package(&mut registry)?;
    registry.spawn(texture, "PreviewTexture", Some(transient))?;

    let cdo = registry.spawn(actor, "Default__Actor", None)?;
    registry.set_flags(cdo, ObjectFlags::CLASS_DEFAULT)?;

    Ok(registry)
}

fn print_rows(view: &mut OutlinerView, items: &[ItemId], depth: usize) {
    for &item in items {
        let Some(row) = view.row(item) else {
            continue;
        };
        let marker = if row.subdued { "~" } else { " " };
        println!(
            "{marker}{:indent$}{:<28} {:<18} {:>10}",
            "",
            row.name,
            row.class_name,
            row.memory,
            indent = depth * 2
        );
        let children = view.children(item);
        print_rows(view, &children, depth + 1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = Arc::new(SharedObjectRegistry::from_registry(build_population()?));

    println!("Population:");
    registry.with_read(|r| print!("{}", ObjectTreeDebug::new(r)));

    // Keep the demo away from the user's real settings file.
    let settings = Arc::new(Settings::new());
    if let Some(path) = default_settings_path() {
        println!("\n(user settings would live at {})", path.display());
    }

    let mut view = OutlinerView::new(registry, settings)?;
    view.toggle_drop_down_filter("Filter_Textures")?;
    view.sort_by(SortColumn::Memory, SortMode::Descending);

    println!("\nList, by memory:");
    let roots = view.root_items().to_vec();
    print_rows(&mut view, &roots, 0);
    println!("{}", view.status_text());

    view.set_display_mode(DisplayMode::Tree);
    view.sort_by(SortColumn::Name, SortMode::Ascending);

    println!("\nTree, by name:");
    let roots = view.root_items().to_vec();
    print_rows(&mut view, &roots, 0);
    println!("{}", view.status_text());

    view.set_search_text("crate -2");
    println!("\nSearch \"crate -2\": {}", view.status_text());

    Ok(())
}
