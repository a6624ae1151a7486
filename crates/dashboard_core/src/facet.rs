use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{AppliedFilters, ResultItem};

/// A filterable category with the distinct values observed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    #[serde(alias = "key")]
    pub category: String,
    #[serde(alias = "value")]
    pub values: Vec<String>,
}

/// Facet list for one domain, always in configured category order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Facets {
    facets: Vec<Facet>,
}

impl Facets {
    /// Distinct values per category as observed in `dataset`.
    ///
    /// Values are deduplicated case-insensitively (first spelling wins) and
    /// sorted case-insensitively.
    pub fn derive(dataset: &[ResultItem], categories: &[String]) -> Self {
        let facets = categories
            .iter()
            .map(|category| {
                let mut seen = HashSet::new();
                let mut values: Vec<String> = dataset
                    .iter()
                    .filter_map(|item| item.get(category))
                    .filter(|value| seen.insert(value.filter_key()))
                    .map(ToString::to_string)
                    .collect();
                sort_values(&mut values);
                Facet {
                    category: category.clone(),
                    values,
                }
            })
            .collect();
        Self { facets }
    }

    /// Facets supplied by the server, aligned to the configured categories.
    ///
    /// Categories the server did not describe get no options; server facets
    /// for categories outside the configuration are ignored.
    pub fn from_server(server: Vec<Facet>, categories: &[String]) -> Self {
        let facets = categories
            .iter()
            .map(|category| {
                let mut values = server
                    .iter()
                    .find(|facet| &facet.category == category)
                    .map(|facet| facet.values.clone())
                    .unwrap_or_default();
                let mut seen = HashSet::new();
                values.retain(|value| !value.is_empty() && seen.insert(value.to_lowercase()));
                sort_values(&mut values);
                Facet {
                    category: category.clone(),
                    values,
                }
            })
            .collect();
        Self { facets }
    }

    /// Adds `previous` options back into every category `applied` constrains.
    ///
    /// Results filtered by the backend only carry the values already applied,
    /// which would hide every alternative for those categories.
    pub fn keep_constrained(mut self, previous: &Facets, applied: &AppliedFilters) -> Self {
        for facet in &mut self.facets {
            if applied.get(&facet.category).is_none() {
                continue;
            }
            let mut seen: HashSet<String> =
                facet.values.iter().map(|v| v.to_lowercase()).collect();
            let restored = previous
                .options(&facet.category)
                .iter()
                .filter(|value| seen.insert(value.to_lowercase()))
                .cloned()
                .collect::<Vec<_>>();
            if !restored.is_empty() {
                facet.values.extend(restored);
                sort_values(&mut facet.values);
            }
        }
        self
    }

    /// Options for a category; unknown categories have none.
    pub fn options(&self, category: &str) -> &[String] {
        self.facets
            .iter()
            .find(|facet| facet.category == category)
            .map(|facet| facet.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    pub fn as_slice(&self) -> &[Facet] {
        &self.facets
    }
}

fn sort_values(values: &mut [String]) {
    values.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
}
