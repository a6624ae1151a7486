use std::collections::{BTreeMap, HashSet};

use dashboard_logging::dash_debug;

use crate::ResultItem;

/// How a toggled option affects its category's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Add the value if absent, remove it if present.
    Multi,
    /// Replace the whole selection with the value.
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFilter {
    pub category: String,
    pub values: Vec<String>,
}

/// Pending, uncommitted choices: one entry per known category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectedFilters {
    entries: Vec<SelectedFilter>,
}

impl SelectedFilters {
    pub fn for_categories(categories: &[String]) -> Self {
        Self {
            entries: categories
                .iter()
                .map(|category| SelectedFilter {
                    category: category.clone(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn get(&self, category: &str) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedFilter> {
        self.entries.iter()
    }

    fn entry_mut(&mut self, category: &str) -> &mut SelectedFilter {
        let index = match self.entries.iter().position(|e| e.category == category) {
            Some(index) => index,
            None => {
                self.entries.push(SelectedFilter {
                    category: category.to_string(),
                    values: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    fn toggle(&mut self, category: &str, value: &str, mode: SelectMode) {
        let entry = self.entry_mut(category);
        match mode {
            SelectMode::Single => {
                entry.values = vec![value.to_string()];
            }
            SelectMode::Multi => {
                if let Some(pos) = entry.values.iter().position(|v| v == value) {
                    entry.values.remove(pos);
                } else {
                    entry.values.push(value.to_string());
                }
            }
        }
    }

    fn set(&mut self, category: &str, values: &[String]) {
        self.entry_mut(category).values = values.to_vec();
    }

    fn remove_value(&mut self, category: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.category == category) {
            entry.values.retain(|v| !v.eq_ignore_ascii_case(value));
        }
    }

    fn clear_category(&mut self, category: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.category == category) {
            entry.values.clear();
        }
    }

    fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.values.clear();
        }
    }
}

/// Committed filters: only categories with at least one value are present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppliedFilters {
    map: BTreeMap<String, Vec<String>>,
}

impl AppliedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.map.get(category).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Sets a category's values. Empty strings and duplicates are dropped; if
    /// nothing remains the category is removed.
    pub fn set(&mut self, category: impl Into<String>, values: impl IntoIterator<Item = String>) {
        let category = category.into();
        let mut seen = HashSet::new();
        let values: Vec<String> = values
            .into_iter()
            .filter(|v| !v.is_empty() && seen.insert(v.clone()))
            .collect();
        if values.is_empty() {
            self.map.remove(&category);
        } else {
            self.map.insert(category, values);
        }
    }

    /// Removes one value; an emptied category is deleted outright.
    pub fn remove_value(&mut self, category: &str, value: &str) -> bool {
        let Some(values) = self.map.get_mut(category) else {
            return false;
        };
        let before = values.len();
        values.retain(|v| !v.eq_ignore_ascii_case(value));
        let changed = values.len() != before;
        if values.is_empty() {
            self.map.remove(category);
        }
        changed
    }

    pub fn remove_category(&mut self, category: &str) -> bool {
        self.map.remove(category).is_some()
    }

    /// True iff the item satisfies every constrained category.
    pub fn matches(&self, item: &ResultItem) -> bool {
        self.matcher().matches(item)
    }

    /// The filtered view: every item when no filter is applied.
    pub fn filter<'a>(&self, dataset: &'a [ResultItem]) -> Vec<&'a ResultItem> {
        self.matching_indices(dataset)
            .into_iter()
            .map(|index| &dataset[index])
            .collect()
    }

    /// Indices into `dataset` of the items in the filtered view, in order.
    pub fn matching_indices(&self, dataset: &[ResultItem]) -> Vec<usize> {
        if self.is_empty() {
            return (0..dataset.len()).collect();
        }
        let matcher = self.matcher();
        dataset
            .iter()
            .enumerate()
            .filter(|(_, item)| matcher.matches(item))
            .map(|(index, _)| index)
            .collect()
    }

    /// Filter parameter understood by the backend: `key='v1','v2'&key2='v3'`.
    pub fn encode_for_backend(&self) -> String {
        self.map
            .iter()
            .map(|(category, values)| {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
                format!("{category}={}", quoted.join(","))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            constraints: self
                .map
                .iter()
                .map(|(category, values)| {
                    (
                        category.as_str(),
                        values.iter().map(|v| v.to_lowercase()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for AppliedFilters {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut applied = AppliedFilters::new();
        for (category, values) in map {
            applied.set(category, values);
        }
        applied
    }
}

struct Matcher<'a> {
    constraints: Vec<(&'a str, HashSet<String>)>,
}

impl Matcher<'_> {
    fn matches(&self, item: &ResultItem) -> bool {
        self.constraints.iter().all(|(category, allowed)| {
            item.get(category)
                .is_some_and(|value| allowed.contains(&value.filter_key()))
        })
    }
}

/// Selected and applied filter state for one domain view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEngine {
    active_category: Option<String>,
    selected: SelectedFilters,
    applied: AppliedFilters,
}

impl FilterEngine {
    pub fn new(categories: &[String]) -> Self {
        Self {
            active_category: categories.first().cloned(),
            selected: SelectedFilters::for_categories(categories),
            applied: AppliedFilters::new(),
        }
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    pub fn selected(&self) -> &SelectedFilters {
        &self.selected
    }

    pub fn applied(&self) -> &AppliedFilters {
        &self.applied
    }

    /// Only changes which facet's options are offered.
    pub fn set_active_category(&mut self, category: &str) {
        self.active_category = Some(category.to_string());
    }

    pub fn toggle_option(&mut self, category: &str, value: &str, mode: SelectMode) {
        self.selected.toggle(category, value, mode);
    }

    /// Replaces a category's selection with `values`.
    pub fn select_values(&mut self, category: &str, values: &[String]) {
        self.selected.set(category, values);
    }

    /// Applied filters become exactly the non-empty selections.
    ///
    /// Returns whether the applied filters changed.
    pub fn commit(&mut self) -> bool {
        let mut next = AppliedFilters::new();
        for entry in self.selected.iter() {
            next.set(entry.category.clone(), entry.values.iter().cloned());
        }
        let changed = next != self.applied;
        dash_debug!("commit filters changed={changed} categories={}", next.len());
        self.applied = next;
        changed
    }

    /// Applies the selection of one category, leaving pending selections in
    /// the others uncommitted.
    pub fn commit_category(&mut self, category: &str) -> bool {
        let before = self.applied.get(category).map(<[String]>::to_vec);
        self.applied.set(category, self.selected.get(category).iter().cloned());
        let changed = self.applied.get(category).map(<[String]>::to_vec) != before;
        dash_debug!("commit {category} changed={changed}");
        changed
    }

    pub fn remove(&mut self, category: &str, value: &str) -> bool {
        self.selected.remove_value(category, value);
        self.applied.remove_value(category, value)
    }

    pub fn clear_all(&mut self) -> bool {
        self.selected.clear();
        let changed = !self.applied.is_empty();
        self.applied = AppliedFilters::new();
        changed
    }

    /// Drops one category from both selections and applied filters.
    pub fn clear_category(&mut self, category: &str) -> bool {
        self.selected.clear_category(category);
        self.applied.remove_category(category)
    }

    /// Replaces all state with filters read from a location, keeping the
    /// selection mirror of what is applied.
    pub fn seed(&mut self, applied: AppliedFilters) {
        self.selected.clear();
        for (category, values) in applied.iter() {
            self.selected.set(category, values);
        }
        self.applied = applied;
    }
}
