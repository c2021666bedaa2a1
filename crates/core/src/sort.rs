//! User-triggered column sorting.
//!
//! Sorting is stable, so items that compare equal keep their backend order. Missing or
//! unparsable timestamps and missing patient names sort first in ascending order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::WorklistItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    AssignedAt,
    PatientName,
    DisplayId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

pub fn sort_items(items: &mut [&WorklistItem], spec: SortSpec) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, spec.key);
        match spec.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &WorklistItem, b: &WorklistItem, key: SortKey) -> Ordering {
    match key {
        SortKey::AssignedAt => a.assigned_at_utc().cmp(&b.assigned_at_utc()),
        SortKey::PatientName => patient_sort_name(a).cmp(&patient_sort_name(b)),
        SortKey::DisplayId => a.display_id.cmp(&b.display_id),
    }
}

fn patient_sort_name(item: &WorklistItem) -> Option<String> {
    item.patient_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
}
