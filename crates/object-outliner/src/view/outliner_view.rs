//! The outliner presentation adapter.
//!
//! [`OutlinerView`] wires the filter sets and the text filter into an
//! [`OutlinerModel`], keeps the user's selection and expansion, persists the
//! outliner fields of the injected settings store and repopulates after every
//! user action that changes what is shown.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use object_outliner::catalog::register_engine_classes;
//! use object_outliner::config::Settings;
//! use object_outliner::view::OutlinerView;
//! use object_outliner_core::SharedObjectRegistry;
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! registry.with_write(register_engine_classes).unwrap();
//! let actor = registry.with_read(|r| r.find_class("Actor")).unwrap();
//! registry.spawn(actor, "Hero", None).unwrap();
//!
//! let mut view = OutlinerView::new(registry, Arc::new(Settings::new())).unwrap();
//! assert_eq!(view.status_text(), "1 objects (Discovered: 1)");
//!
//! view.set_search_text("villain");
//! assert_eq!(view.status_text(), "No matching objects (1 total, discovered 1)");
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use object_outliner_core::logging::{span_names, targets, PerfSpan};
use object_outliner_core::{ObjectId, SharedObjectRegistry};
use parking_lot::{RwLock, RwLockReadGuard};

use super::actions::{context_actions, ContextAction};
use super::row::RowPresentation;
use crate::catalog;
use crate::config::{OutlinerSettings, SharedSettings};
use crate::error::OutlinerResult;
use crate::model::{
    ContentCounts, DisplayMode, FilterSet, ItemId, OutlinerModel, SortColumn, SortMode, TextFilter,
};

/// Coloring hint for the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTone {
    /// No search is active.
    #[default]
    Normal,
    /// The search matched something.
    Success,
    /// The search matched nothing.
    Failure,
}

/// The status line under the outliner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStatus {
    pub text: String,
    pub tone: StatusTone,
}

/// Outliner state and user actions.
pub struct OutlinerView {
    registry: Arc<SharedObjectRegistry>,
    settings: SharedSettings,
    model: OutlinerModel,
    imperative_filters: Arc<RwLock<FilterSet>>,
    drop_down_filters: Arc<RwLock<FilterSet>>,
    show_only_checked: Arc<AtomicBool>,
    text_filter: Arc<TextFilter>,
    display_mode: DisplayMode,
    sort_column: SortColumn,
    sort_mode: SortMode,
    selected: Option<ItemId>,
    expanded: HashSet<ItemId>,
    /// Identity map of the last rebuild.
    processed: HashMap<ObjectId, ItemId>,
}

impl OutlinerView {
    /// Creates a view with the default filter catalog and populates it.
    pub fn new(registry: Arc<SharedObjectRegistry>, settings: SharedSettings) -> OutlinerResult<Self> {
        let imperative = catalog::imperative_filters()?;
        let drop_down = registry.with_read(catalog::drop_down_filters)?;
        Ok(Self::with_filters(registry, settings, imperative, drop_down))
    }

    /// Creates a view over custom filter sets and populates it.
    ///
    /// Filters named in the persisted active sets are enabled; nothing is
    /// disabled.
    pub fn with_filters(
        registry: Arc<SharedObjectRegistry>,
        settings: SharedSettings,
        mut imperative: FilterSet,
        mut drop_down: FilterSet,
    ) -> Self {
        let stored = OutlinerSettings::load(&settings);
        imperative.enable_named(&stored.active_imperative_filters);
        drop_down.enable_named(&stored.active_drop_down_filters);

        let mut view = Self {
            registry,
            settings,
            model: OutlinerModel::new(),
            imperative_filters: Arc::new(RwLock::new(imperative)),
            drop_down_filters: Arc::new(RwLock::new(drop_down)),
            show_only_checked: Arc::new(AtomicBool::new(stored.show_only_checked)),
            text_filter: Arc::new(TextFilter::for_outliner()),
            display_mode: stored.display_mode,
            sort_column: stored.sort_column,
            sort_mode: stored.sort_mode,
            selected: None,
            expanded: HashSet::new(),
            processed: HashMap::new(),
        };
        view.bind_filters();
        view.populate();
        view
    }

    fn bind_filters(&mut self) {
        let imperative = self.imperative_filters.clone();
        let drop_down = self.drop_down_filters.clone();
        let show_only_checked = self.show_only_checked.clone();
        self.model.set_structural_filter(move |object| {
            let object = Some(object);
            if imperative.read().should_skip(object) {
                return false;
            }
            let drop_down = drop_down.read();
            if show_only_checked.load(Ordering::Relaxed) {
                drop_down.matches_any_enabled(object)
            } else {
                !drop_down.matches_any_disabled(object)
            }
        });

        let text_filter = self.text_filter.clone();
        self.model
            .set_text_filter(move |object| text_filter.passes(Some(object)));
    }

    // =========================================================================
    // Population
    // =========================================================================

    /// Rebuilds the content, keeping the selection and expansion of every
    /// object that is still shown.
    pub fn populate(&mut self) {
        let _span = PerfSpan::new(span_names::POPULATE);

        let selected_object = self.selected_object();
        let expanded_objects: Vec<ObjectId> = self
            .expanded
            .iter()
            .filter_map(|&item| self.model.tree().get(item).map(|node| node.object()))
            .collect();

        let mode = self.display_mode;
        let (column, sort_mode) = (self.sort_column, self.sort_mode);
        let model = &mut self.model;
        let processed = &mut self.processed;
        self.registry.with_read(|registry| {
            model.update_content(registry, mode, Some(processed));
            model.sort_roots(registry, column, sort_mode);
        });

        self.selected = None;
        self.expanded.clear();
        if mode.is_hierarchical() {
            self.expanded.extend(
                expanded_objects
                    .iter()
                    .filter_map(|object| self.processed.get(object).copied()),
            );
        }

        if let Some(object) = selected_object {
            match self.processed.get(&object).copied() {
                Some(item) => {
                    self.selected = Some(item);
                    if mode.is_hierarchical() {
                        let ancestors: Vec<ItemId> = self.model.tree().ancestors(item).collect();
                        self.expanded.extend(ancestors);
                    }
                }
                None => {
                    tracing::debug!(target: targets::VIEW, ?object, "selected object no longer shown");
                }
            }
        }

        tracing::debug!(
            target: targets::VIEW,
            displayed = self.model.counts().displayed,
            expanded = self.expanded.len(),
            selected = self.selected.is_some(),
            "populated"
        );
    }

    /// Rebuilds without any other change.
    pub fn refresh(&mut self) {
        self.populate();
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Enables or disables an imperative filter.
    pub fn set_imperative_filter(&mut self, name: &str, enabled: bool) -> OutlinerResult<()> {
        self.imperative_filters.write().set_enabled(name, enabled)?;
        self.store_settings();
        self.populate();
        Ok(())
    }

    /// Flips a drop-down filter and returns its new state.
    pub fn toggle_drop_down_filter(&mut self, name: &str) -> OutlinerResult<bool> {
        let enabled = self.drop_down_filters.write().toggle(name)?;
        self.store_settings();
        self.populate();
        Ok(enabled)
    }

    /// Flips "show only checked" and returns its new state.
    pub fn toggle_show_only_checked(&mut self) -> bool {
        let enabled = !self.show_only_checked.load(Ordering::Relaxed);
        self.show_only_checked.store(enabled, Ordering::Relaxed);
        self.store_settings();
        self.populate();
        enabled
    }

    /// Enables every drop-down filter if more are disabled than enabled,
    /// otherwise disables every one. Returns the state applied.
    pub fn toggle_all_drop_down_filters(&mut self) -> bool {
        let enabled = {
            let mut filters = self.drop_down_filters.write();
            let enabled = filters.disabled_count() > filters.enabled_count();
            filters.set_all_enabled(enabled);
            enabled
        };
        self.store_settings();
        self.populate();
        enabled
    }

    /// Switches between list and tree.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.display_mode == mode {
            return;
        }
        self.display_mode = mode;
        self.store_settings();
        self.populate();
    }

    /// Replaces the search text, repopulating if it changed.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        if self.text_filter.set_raw_text(text) {
            self.populate();
        }
    }

    /// Changes the sort column and direction and re-sorts the roots.
    ///
    /// Children are re-sorted lazily the next time they are requested.
    pub fn sort_by(&mut self, column: SortColumn, mode: SortMode) {
        self.sort_column = column;
        self.sort_mode = mode;
        self.store_settings();

        let model = &mut self.model;
        self.registry
            .with_read(|registry| model.sort_roots(registry, column, mode));
    }

    // =========================================================================
    // Content access
    // =========================================================================

    /// Root content in display order.
    pub fn root_items(&self) -> &[ItemId] {
        self.model.root_items()
    }

    /// Children of `item`, sorted on first request after they changed.
    ///
    /// Always empty in list mode.
    pub fn children(&mut self, item: ItemId) -> Vec<ItemId> {
        if !self.display_mode.is_hierarchical() {
            return Vec::new();
        }
        let (column, mode) = (self.sort_column, self.sort_mode);
        let model = &mut self.model;
        self.registry
            .with_read(|registry| model.sorted_children(registry, item, column, mode).to_vec())
    }

    /// Presentation of one row.
    pub fn row(&self, item: ItemId) -> Option<RowPresentation> {
        let highlight = self.text_filter.raw_text();
        self.registry.with_read(|registry| {
            RowPresentation::build(self.model.tree(), registry, item, &highlight)
        })
    }

    /// Context menu actions for one row.
    pub fn context_actions(&self, item: ItemId) -> Vec<ContextAction> {
        let Some(object) = self.model.tree().get(item).map(|node| node.object()) else {
            return Vec::new();
        };
        self.registry
            .with_read(|registry| context_actions(registry, object))
    }

    /// The underlying model.
    pub fn model(&self) -> &OutlinerModel {
        &self.model
    }

    /// Counters of the last rebuild.
    pub fn counts(&self) -> ContentCounts {
        self.model.counts()
    }

    // =========================================================================
    // Selection and expansion
    // =========================================================================

    /// Selects a node, or clears the selection. Unknown ids clear it too.
    pub fn select(&mut self, item: Option<ItemId>) {
        self.selected = item.filter(|&id| self.model.tree().get(id).is_some());
    }

    /// Selects the node built for `object`, if it is shown.
    pub fn select_object(&mut self, object: ObjectId) -> bool {
        self.selected = self.processed.get(&object).copied();
        self.selected.is_some()
    }

    /// The selected node.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.selected
    }

    /// The object of the selected node.
    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selected
            .and_then(|id| self.model.tree().get(id))
            .map(|node| node.object())
    }

    /// Expands or collapses one node.
    pub fn set_expansion(&mut self, item: ItemId, expanded: bool) {
        if self.model.tree().get(item).is_none() {
            return;
        }
        if expanded {
            self.expanded.insert(item);
        } else {
            self.expanded.remove(&item);
        }
    }

    /// Expands or collapses a node and its whole subtree.
    pub fn set_expansion_recursive(&mut self, item: ItemId, expanded: bool) {
        let mut stack = vec![item];
        while let Some(current) = stack.pop() {
            self.set_expansion(current, expanded);
            stack.extend_from_slice(self.model.tree().children(current));
        }
    }

    /// Returns `true` if the node is expanded.
    pub fn is_expanded(&self, item: ItemId) -> bool {
        self.expanded.contains(&item)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current display mode.
    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Current sort column.
    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    /// Current sort direction.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Whether only objects matching an enabled drop-down filter are shown.
    pub fn show_only_checked(&self) -> bool {
        self.show_only_checked.load(Ordering::Relaxed)
    }

    /// The imperative (toolbar) filters.
    pub fn imperative_filters(&self) -> RwLockReadGuard<'_, FilterSet> {
        self.imperative_filters.read()
    }

    /// The drop-down menu filters.
    pub fn drop_down_filters(&self) -> RwLockReadGuard<'_, FilterSet> {
        self.drop_down_filters.read()
    }

    /// The search box filter.
    pub fn text_filter(&self) -> &TextFilter {
        &self.text_filter
    }

    /// The persisted fields as they are now.
    pub fn current_settings(&self) -> OutlinerSettings {
        OutlinerSettings {
            active_imperative_filters: self.imperative_filters.read().enabled_names(),
            active_drop_down_filters: self.drop_down_filters.read().enabled_names(),
            show_only_checked: self.show_only_checked(),
            display_mode: self.display_mode,
            sort_column: self.sort_column,
            sort_mode: self.sort_mode,
        }
    }

    fn store_settings(&self) {
        self.current_settings().store(&self.settings);
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// The status line for the last rebuild.
    pub fn status(&self) -> FilterStatus {
        let ContentCounts {
            discovered,
            filtered,
            displayed,
        } = self.model.counts();

        if !self.text_filter.is_active() {
            return FilterStatus {
                text: format!("{displayed} objects (Discovered: {discovered})"),
                tone: StatusTone::Normal,
            };
        }
        if displayed == 0 {
            return FilterStatus {
                text: format!("No matching objects ({filtered} total, discovered {discovered})"),
                tone: StatusTone::Failure,
            };
        }
        FilterStatus {
            text: format!("Showing {displayed} of {filtered} objects (Discovered: {discovered})"),
            tone: StatusTone::Success,
        }
    }

    /// Text of [`OutlinerView::status`].
    pub fn status_text(&self) -> String {
        self.status().text
    }
}

impl Drop for OutlinerView {
    fn drop(&mut self) {
        if let Err(e) = self.settings.sync() {
            tracing::error!(target: targets::CONFIG, error = %e, "failed to save outliner settings");
        }
    }
}

static_assertions::assert_impl_all!(OutlinerView: Send);
