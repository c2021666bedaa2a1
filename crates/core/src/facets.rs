//! Filter facets derived from the loaded worklist.
//!
//! Facets are the option lists behind the kind, type, status and patient filters. They are
//! always computed from the full loaded item set (never the filtered subset), so a filter
//! menu lists exactly the values that occur in the data: no value with zero occurrences and
//! no occurring value left out.

use std::collections::HashSet;

use lab_types::Locale;
use serde::Serialize;

use crate::labels::{item_type_label, kind_label};
use crate::model::WorklistItem;
use crate::status::{is_completed_status, status_label};

/// One selectable filter value and its display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

/// Option lists for every filterable column.
///
/// `kinds`, `item_types` and `statuses` keep first-occurrence order. `patients` is sorted by
/// name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub kinds: Vec<FacetOption>,
    pub item_types: Vec<FacetOption>,
    pub statuses: Vec<FacetOption>,
    pub patients: Vec<FacetOption>,
}

impl Facets {
    pub fn derive(items: &[WorklistItem], locale: Locale) -> Self {
        let kinds = distinct(items.iter().map(|item| (item.kind.as_str(), item)), |item| {
            kind_label(&item.kind, locale)
        });
        let item_types = distinct(
            items.iter().map(|item| (item.item_type.as_str(), item)),
            |item| item_type_label(&item.item_type, locale),
        );
        let statuses = distinct(
            items.iter().map(|item| (item.item_status.as_str(), item)),
            |item| status_label(&item.item_status, locale),
        );

        let mut patients = distinct(
            items
                .iter()
                .filter_map(|item| item.patient().map(|patient| (patient.id, patient))),
            |patient| patient.display_name().to_string(),
        );
        patients.sort_by(|a, b| {
            a.label
                .to_lowercase()
                .cmp(&b.label.to_lowercase())
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.value.cmp(&b.value))
        });

        Self {
            kinds,
            item_types,
            statuses,
            patients,
        }
    }

    /// The status selection applied before the user touches the status filter: every
    /// present status that is not a completed status.
    pub fn default_status_selection(&self) -> Vec<String> {
        self.statuses
            .iter()
            .filter(|option| !is_completed_status(&option.value))
            .map(|option| option.value.clone())
            .collect()
    }

    pub fn status_values(&self) -> Vec<&str> {
        self.statuses.iter().map(|option| option.value.as_str()).collect()
    }
}

/// Deduplicate `(key, source)` pairs by key, keeping the first source for each key.
fn distinct<'a, T, I, F>(pairs: I, label: F) -> Vec<FacetOption>
where
    I: Iterator<Item = (&'a str, T)>,
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for (key, source) in pairs {
        if seen.insert(key) {
            options.push(FacetOption {
                value: key.to_string(),
                label: label(&source),
            });
        }
    }
    options
}
