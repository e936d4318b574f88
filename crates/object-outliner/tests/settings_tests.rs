//! Persistence of the outliner fields across sessions.

use std::collections::BTreeSet;
use std::sync::Arc;

use object_outliner::catalog::register_engine_classes;
use object_outliner::config::{keys, OutlinerSettings, Settings, SettingsValue};
use object_outliner::model::{DisplayMode, SortColumn, SortMode};
use object_outliner::view::OutlinerView;
use object_outliner_core::SharedObjectRegistry;
use parking_lot::Mutex;
use tempfile::TempDir;

fn engine_registry() -> Arc<SharedObjectRegistry> {
    let registry = Arc::new(SharedObjectRegistry::new());
    registry.with_write(register_engine_classes).unwrap();
    registry
}

#[test]
fn test_view_state_round_trips_through_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outliner").join("settings.toml");
    let registry = engine_registry();

    {
        let settings = Arc::new(Settings::open(&path).unwrap());
        let mut view = OutlinerView::new(registry.clone(), settings).unwrap();
        view.set_imperative_filter("Filter_CDO", true).unwrap();
        view.toggle_drop_down_filter("Filter_Textures").unwrap();
        view.toggle_show_only_checked();
        view.set_display_mode(DisplayMode::Tree);
        view.sort_by(SortColumn::Class, SortMode::Descending);
    }
    assert!(path.exists());

    let settings = Arc::new(Settings::open(&path).unwrap());
    let view = OutlinerView::new(registry, settings).unwrap();

    assert!(view.imperative_filters().get("Filter_CDO").unwrap().is_enabled());
    assert!(view.drop_down_filters().get("Filter_Textures").unwrap().is_enabled());
    assert!(view.drop_down_filters().get("Filter_Actor").unwrap().is_enabled());
    assert!(view.show_only_checked());
    assert_eq!(view.display_mode(), DisplayMode::Tree);
    assert_eq!(view.sort_column(), SortColumn::Class);
    assert_eq!(view.sort_mode(), SortMode::Descending);
}

#[test]
fn test_loading_never_disables_default_filters() {
    let settings = Arc::new(Settings::new());
    settings.set(keys::ACTIVE_DROP_DOWN_FILTERS, vec!["Filter_Package"]);

    let view = OutlinerView::new(engine_registry(), settings).unwrap();

    let enabled = view.drop_down_filters().enabled_names();
    assert_eq!(
        enabled,
        BTreeSet::from(["Filter_Actor".to_string(), "Filter_Package".to_string()])
    );
}

#[test]
fn test_toggle_writes_active_set() {
    let settings = Arc::new(Settings::new());
    let mut view = OutlinerView::new(engine_registry(), settings.clone()).unwrap();

    view.toggle_drop_down_filter("Filter_Actor").unwrap();

    let stored = settings.get_raw(keys::ACTIVE_DROP_DOWN_FILTERS).unwrap();
    assert_eq!(stored, SettingsValue::Array(Vec::new()));
    assert_eq!(OutlinerSettings::load(&settings), view.current_settings());
}

#[test]
fn test_toggle_is_saved_as_one_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    let settings = Arc::new(Settings::open(&path).unwrap());
    let mut view = OutlinerView::new(engine_registry(), settings.clone()).unwrap();

    let on_disk = Arc::new(Mutex::new(Vec::new()));
    let on_disk_clone = on_disk.clone();
    let file = path.clone();
    settings.changed().connect(move |_| {
        let stored = Settings::load_toml(&file).unwrap();
        on_disk_clone.lock().push(OutlinerSettings::load(&stored));
    });

    view.toggle_drop_down_filter("Filter_Textures").unwrap();

    let expected = view.current_settings();
    let on_disk = on_disk.lock();
    assert_eq!(on_disk.len(), 6);
    assert!(on_disk.iter().all(|stored| *stored == expected));
}

#[test]
fn test_malformed_settings_fall_back_to_defaults() {
    let settings = Arc::new(Settings::new());
    settings.set(keys::DISPLAY_MODE, "grid");
    settings.set(keys::SHOW_ONLY_CHECKED, 3i64);

    let view = OutlinerView::new(engine_registry(), settings).unwrap();

    assert_eq!(view.display_mode(), DisplayMode::List);
    assert!(!view.show_only_checked());
}

#[test]
fn test_json_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::open(&path).unwrap();
    OutlinerSettings {
        display_mode: DisplayMode::Tree,
        ..OutlinerSettings::default()
    }
    .store(&settings);
    settings.sync().unwrap();

    let reloaded = Settings::load_json(&path).unwrap();
    assert_eq!(OutlinerSettings::load(&reloaded).display_mode, DisplayMode::Tree);
}
