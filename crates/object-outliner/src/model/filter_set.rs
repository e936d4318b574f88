//! Ordered collections of filters and their aggregate predicates.

use std::collections::BTreeSet;

use object_outliner_core::logging::targets;
use object_outliner_core::ObjectRef;

use super::filter::Filter;
use crate::error::{OutlinerError, OutlinerResult};

/// An ordered set of uniquely named filters.
///
/// Insertion order is display order, and it also decides which filter wins in
/// [`FilterSet::should_skip`].
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from filters, rejecting duplicate names.
    pub fn from_filters(filters: impl IntoIterator<Item = Filter>) -> OutlinerResult<Self> {
        let mut set = Self::new();
        for filter in filters {
            set.add(filter)?;
        }
        Ok(set)
    }

    /// Appends a filter.
    pub fn add(&mut self, filter: Filter) -> OutlinerResult<()> {
        if self.contains(filter.name()) {
            return Err(OutlinerError::DuplicateFilterName(filter.name().to_string()));
        }
        tracing::trace!(target: targets::FILTER, name = filter.name(), enabled = filter.is_enabled(), "registered filter");
        self.filters.push(filter);
        Ok(())
    }

    /// Returns `true` if a filter with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Looks up a filter by name.
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name() == name)
    }

    fn get_mut(&mut self, name: &str) -> OutlinerResult<&mut Filter> {
        self.filters
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| OutlinerError::UnknownFilter(name.to_string()))
    }

    /// Sets the enabled flag of a named filter.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> OutlinerResult<()> {
        self.get_mut(name)?.set_enabled(enabled);
        Ok(())
    }

    /// Flips the enabled flag of a named filter and returns the new state.
    pub fn toggle(&mut self, name: &str) -> OutlinerResult<bool> {
        let filter = self.get_mut(name)?;
        let enabled = !filter.is_enabled();
        filter.set_enabled(enabled);
        Ok(enabled)
    }

    /// Sets every filter's enabled flag.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for filter in &mut self.filters {
            filter.set_enabled(enabled);
        }
    }

    /// Enables every filter named in `names`.
    ///
    /// Never disables anything, so filters enabled by default stay enabled.
    /// Unknown names are ignored.
    pub fn enable_named<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            match self.get_mut(name) {
                Ok(filter) => filter.set_enabled(true),
                Err(_) => {
                    tracing::debug!(target: targets::FILTER, %name, "ignoring unknown persisted filter")
                }
            }
        }
    }

    /// Names of the enabled filters.
    pub fn enabled_names(&self) -> BTreeSet<String> {
        self.filters
            .iter()
            .filter(|f| f.is_enabled())
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Number of enabled filters.
    pub fn enabled_count(&self) -> usize {
        self.filters.iter().filter(|f| f.is_enabled()).count()
    }

    /// Number of disabled filters.
    pub fn disabled_count(&self) -> usize {
        self.filters.len() - self.enabled_count()
    }

    /// Iterates the filters in order.
    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the set has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// First-match-wins skip test.
    ///
    /// The first filter (in order) that passes the object decides: the object
    /// is skipped iff that filter is disabled. Objects no filter passes are
    /// not skipped.
    pub fn should_skip(&self, object: Option<ObjectRef<'_>>) -> bool {
        if object.is_none() {
            return false;
        }
        self.filters
            .iter()
            .find(|f| f.is_pass(object))
            .is_some_and(|f| !f.is_enabled())
    }

    /// Returns `true` if any enabled filter passes the object.
    pub fn matches_any_enabled(&self, object: Option<ObjectRef<'_>>) -> bool {
        object.is_some() && self.filters.iter().any(|f| f.is_enabled() && f.is_pass(object))
    }

    /// Returns `true` if any disabled filter passes the object.
    pub fn matches_any_disabled(&self, object: Option<ObjectRef<'_>>) -> bool {
        object.is_some() && self.filters.iter().any(|f| !f.is_enabled() && f.is_pass(object))
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
