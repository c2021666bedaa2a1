//! Search and column filtering.
//!
//! [`apply`] is the whole compositor: a pure function of the item set, the free-text query,
//! the column filters and the optional sort. Output order is the backend order unless a sort
//! is given.

use serde::Serialize;

use crate::model::WorklistItem;
use crate::sort::{sort_items, SortSpec};
use crate::status::is_completed_status;

// ============================================================================
// Free-text search
// ============================================================================

/// Case-insensitive substring match against the searchable fields of an item.
///
/// The query is trimmed; an empty query matches every item. Absent fields are skipped, so
/// an item without a patient never matches on patient name.
pub fn matches_search(item: &WorklistItem, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    searchable_fields(item).any(|field| field.to_lowercase().contains(&needle))
}

fn searchable_fields(item: &WorklistItem) -> impl Iterator<Item = &str> {
    [
        Some(item.display_id.as_str()).filter(|v| !v.is_empty()),
        item.patient_name.as_deref(),
        item.patient_code.as_deref(),
        item.order_code.as_deref(),
    ]
    .into_iter()
    .flatten()
}

// ============================================================================
// Status filter state machine
// ============================================================================

/// Status filter selection.
///
/// Starts `Unset`, where completed statuses are hidden. The first explicit user selection
/// moves it to `UserOverridden`, which survives reloads of the item set until
/// [`StatusFilter::reset`] returns it to `Unset`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "selected", rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    Unset,
    UserOverridden(Vec<String>),
}

impl StatusFilter {
    pub fn select(&mut self, statuses: Vec<String>) {
        *self = StatusFilter::UserOverridden(statuses);
    }

    pub fn reset(&mut self) {
        *self = StatusFilter::Unset;
    }

    pub fn is_user_overridden(&self) -> bool {
        matches!(self, StatusFilter::UserOverridden(_))
    }

    /// In `Unset` mode an item passes when its status is not completed, which is the same as
    /// membership in the default selection derived from the item set. An empty user
    /// selection passes everything.
    pub fn passes(&self, status: &str) -> bool {
        match self {
            StatusFilter::Unset => !is_completed_status(status),
            StatusFilter::UserOverridden(selected) => passes_selection(selected, status),
        }
    }
}

// ============================================================================
// Column filters
// ============================================================================

/// Categorical filters for each filterable column. Active filters combine with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColumnFilters {
    pub kinds: Vec<String>,
    pub item_types: Vec<String>,
    pub status: StatusFilter,
    pub patients: Vec<String>,
}

impl ColumnFilters {
    /// Clears every filter, including a user status override.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn passes(&self, item: &WorklistItem) -> bool {
        self.passes_except_status(item) && self.status.passes(&item.item_status)
    }

    /// Kind, item type and patient filters only.
    pub fn passes_except_status(&self, item: &WorklistItem) -> bool {
        passes_selection(&self.kinds, item.kind.as_str())
            && passes_selection(&self.item_types, item.item_type.as_str())
            && self.passes_patient(item)
    }

    fn passes_patient(&self, item: &WorklistItem) -> bool {
        if self.patients.is_empty() {
            return true;
        }
        item.patient()
            .is_some_and(|patient| self.patients.iter().any(|id| id == patient.id))
    }
}

/// An empty selection passes everything; otherwise the value must be selected. A selected
/// value that no longer occurs in the data simply matches nothing.
fn passes_selection(selected: &[String], value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|candidate| candidate == value)
}

// ============================================================================
// Compositor
// ============================================================================

/// Everything that decides which rows are visible and in which order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Criteria {
    pub query: String,
    pub filters: ColumnFilters,
    pub sort: Option<SortSpec>,
}

/// Produce the visible subset of `items`, in display order.
pub fn apply<'a>(items: &'a [WorklistItem], criteria: &Criteria) -> Vec<&'a WorklistItem> {
    let mut visible: Vec<&WorklistItem> = items
        .iter()
        .filter(|item| matches_search(item, &criteria.query))
        .filter(|item| criteria.filters.passes(item))
        .collect();

    if let Some(spec) = criteria.sort {
        sort_items(&mut visible, spec);
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::Facets;
    use crate::model::{ItemKind, ItemType};
    use crate::sort::{SortKey, SortOrder};
    use lab_types::Locale;

    fn item(id: &str, item_type: ItemType, status: &str) -> WorklistItem {
        WorklistItem {
            id: id.into(),
            kind: ItemKind::Assignment,
            item_type,
            item_id: id.into(),
            display_id: format!("ORD-{id}"),
            item_status: status.into(),
            assigned_at: String::new(),
            patient_id: None,
            patient_name: None,
            patient_code: None,
            order_code: None,
            link: format!("/orders/{id}"),
        }
    }

    fn ids<'a>(items: &[&'a WorklistItem]) -> Vec<&'a str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    fn sample_items() -> Vec<WorklistItem> {
        let mut a = item("100", ItemType::LabOrder, "RECEIVED");
        a.patient_id = Some("p1".into());
        a.patient_name = Some("María López".into());
        a.patient_code = Some("PAC-001".into());

        let mut b = item("200", ItemType::Sample, "READY");
        b.order_code = Some("ORD-100".into());
        b.kind = ItemKind::Review;

        let c = item("300", ItemType::Report, "DRAFT");
        vec![a, b, c]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let order = item("100", ItemType::LabOrder, "RECEIVED");
        assert!(matches_search(&order, "ord-100"));
        assert!(matches_search(&order, "ORD-100"));
        assert!(matches_search(&order, "100"));
        assert!(!matches_search(&order, "ord-101"));
    }

    #[test]
    fn search_trims_and_treats_blank_as_match_all() {
        let order = item("100", ItemType::LabOrder, "RECEIVED");
        assert!(matches_search(&order, "   "));
        assert!(matches_search(&order, "  ord-100  "));
    }

    #[test]
    fn search_covers_patient_and_order_fields_and_skips_absent_ones() {
        let items = sample_items();
        assert!(matches_search(&items[0], "maría"));
        assert!(matches_search(&items[0], "pac-001"));
        assert!(matches_search(&items[1], "ord-100"));
        assert!(!matches_search(&items[2], "maría"));
    }

    #[test]
    fn default_status_filter_hides_completed() {
        let items = sample_items();
        let visible = apply(&items, &Criteria::default());
        assert_eq!(ids(&visible), vec!["100", "300"]);
    }

    #[test]
    fn unset_filter_matches_default_selection_membership() {
        let items = sample_items();
        let default_selection = Facets::derive(&items, Locale::Es).default_status_selection();

        let by_unset = apply(&items, &Criteria::default());
        let mut criteria = Criteria::default();
        criteria.filters.status.select(default_selection);
        let by_selection = apply(&items, &criteria);

        assert_eq!(ids(&by_unset), ids(&by_selection));
    }

    #[test]
    fn empty_user_selection_shows_everything() {
        let items = sample_items();
        let mut criteria = Criteria::default();
        criteria.filters.status.select(Vec::new());
        assert_eq!(ids(&apply(&items, &criteria)), vec!["100", "200", "300"]);
    }

    #[test]
    fn filters_combine_with_and() {
        let items = sample_items();
        let mut criteria = Criteria::default();
        criteria.filters.status.select(Vec::new());
        criteria.filters.kinds = vec!["review".into()];
        criteria.filters.item_types = vec!["sample".into(), "report".into()];
        assert_eq!(ids(&apply(&items, &criteria)), vec!["200"]);

        criteria.filters.item_types = vec!["report".into()];
        assert!(apply(&items, &criteria).is_empty());
    }

    #[test]
    fn patient_filter_excludes_items_without_patient() {
        let items = sample_items();
        let mut criteria = Criteria::default();
        criteria.filters.patients = vec!["p1".into()];
        assert_eq!(ids(&apply(&items, &criteria)), vec!["100"]);
    }

    #[test]
    fn stale_selection_matches_nothing() {
        let items = sample_items();
        let mut criteria = Criteria::default();
        criteria.filters.status.select(vec!["RETRACTED".into()]);
        criteria.filters.patients = vec!["gone".into()];
        assert!(apply(&items, &criteria).is_empty());
    }

    #[test]
    fn applying_twice_is_identical() {
        let items = sample_items();
        let criteria = Criteria {
            query: "ord".into(),
            filters: ColumnFilters::default(),
            sort: Some(SortSpec::new(SortKey::DisplayId, SortOrder::Descending)),
        };
        let first = apply(&items, &criteria);
        let second = apply(&items, &criteria);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["300", "100"]);
    }

    #[test]
    fn reset_returns_status_filter_to_default() {
        let mut filter = StatusFilter::default();
        filter.select(vec!["READY".into()]);
        assert!(filter.is_user_overridden());
        assert!(filter.passes("READY"));
        filter.reset();
        assert!(!filter.passes("READY"));
    }
}
