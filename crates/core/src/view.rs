//! Worklist page state.
//!
//! [`WorklistView`] owns the loaded items and everything the user can change on the page:
//! search text, column filters and sort. Fetching happens elsewhere; the view only hands out
//! [`FetchTicket`]s and accepts completions.
//!
//! Overlapping fetches resolve as last-request-wins. Each `begin_fetch` issues a ticket with
//! a higher sequence number; a completion is applied only if it carries the latest ticket, so
//! a slow early response can never overwrite a newer one.

use std::fmt::Display;

use lab_types::Locale;
use serde::Serialize;

use crate::facets::Facets;
use crate::filter::{apply, matches_search, ColumnFilters, Criteria, StatusFilter};
use crate::model::{WorklistItem, WorklistPage};
use crate::render::{render_row, RenderContext, WorklistRow};
use crate::sort::SortSpec;
use crate::status::is_completed_status;

/// Sequence stamp of one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// The latest fetch succeeded. The item list may be empty.
    Loaded,
    /// The latest fetch failed. The item list is empty and a retry is possible.
    Failed { message: String },
}

/// Pagination metadata of the latest applied response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

/// Counts shown under the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub loaded: usize,
    pub visible: usize,
    /// Items that match the search and the other column filters but are hidden by the
    /// default status filter.
    pub hidden_completed: usize,
}

#[derive(Clone, Debug)]
pub struct WorklistView {
    locale: Locale,
    state: LoadState,
    items: Vec<WorklistItem>,
    facets: Facets,
    page_meta: Option<PageMeta>,
    criteria: Criteria,
    latest_ticket: u64,
}

impl WorklistView {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            state: LoadState::Idle,
            items: Vec::new(),
            facets: Facets::default(),
            page_meta: None,
            criteria: Criteria::default(),
            latest_ticket: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Mark a fetch as started and return its ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.state = LoadState::Loading;
        FetchTicket(self.latest_ticket)
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` when the ticket is stale and the outcome was discarded.
    pub fn complete_fetch<E: Display>(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<WorklistPage, E>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "discarding stale worklist response (ticket {}, latest {})",
                ticket.0,
                self.latest_ticket
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                self.page_meta = Some(PageMeta {
                    total: page.total,
                    page: page.page,
                    page_size: page.page_size,
                    has_more: page.has_more,
                });
                self.replace_items(page.items);
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!("worklist fetch failed: {}", err);
                self.page_meta = None;
                self.replace_items(Vec::new());
                self.state = LoadState::Failed {
                    message: err.to_string(),
                };
            }
        }
        true
    }

    fn replace_items(&mut self, items: Vec<WorklistItem>) {
        self.facets = Facets::derive(&items, self.locale);
        self.items = items;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn items(&self) -> &[WorklistItem] {
        &self.items
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn page_meta(&self) -> Option<PageMeta> {
        self.page_meta
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch display language. Facet labels are rebuilt; selections are kept.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.facets = Facets::derive(&self.items, locale);
    }

    // ------------------------------------------------------------------------
    // Search, filters and sort
    // ------------------------------------------------------------------------

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.criteria.filters
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
    }

    pub fn select_kinds(&mut self, kinds: Vec<String>) {
        self.criteria.filters.kinds = kinds;
    }

    pub fn select_item_types(&mut self, item_types: Vec<String>) {
        self.criteria.filters.item_types = item_types;
    }

    pub fn select_patients(&mut self, patient_ids: Vec<String>) {
        self.criteria.filters.patients = patient_ids;
    }

    /// Explicit status selection. Takes precedence over the default until reset.
    pub fn select_statuses(&mut self, statuses: Vec<String>) {
        self.criteria.filters.status.select(statuses);
    }

    /// Return the status filter to its default (hide completed).
    pub fn reset_status_filter(&mut self) {
        self.criteria.filters.status.reset();
    }

    /// Clear every filter and the search text. The sort is kept.
    pub fn clear_filters(&mut self) {
        self.criteria.filters.clear();
        self.criteria.query.clear();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.criteria.sort = sort;
    }

    /// Status values currently selected: the user's selection, or the default derived from
    /// the loaded items.
    pub fn status_selection(&self) -> Vec<String> {
        match &self.criteria.filters.status {
            StatusFilter::Unset => self.facets.default_status_selection(),
            StatusFilter::UserOverridden(selected) => selected.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    pub fn visible_items(&self) -> Vec<&WorklistItem> {
        apply(&self.items, &self.criteria)
    }

    pub fn visible_rows(&self, ctx: &RenderContext) -> Vec<WorklistRow> {
        self.visible_items()
            .into_iter()
            .map(|item| render_row(item, ctx))
            .collect()
    }

    /// Navigation target of the item with `id`, if it is currently visible.
    pub fn activate(&self, id: &str) -> Option<&str> {
        self.visible_items()
            .into_iter()
            .find(|item| item.id == id)
            .map(|item| item.link.as_str())
    }

    pub fn summary(&self) -> ViewSummary {
        let hidden_completed = if self.criteria.filters.status.is_user_overridden() {
            0
        } else {
            self.items
                .iter()
                .filter(|item| is_completed_status(&item.item_status))
                .filter(|item| matches_search(item, &self.criteria.query))
                .filter(|item| self.criteria.filters.passes_except_status(item))
                .count()
        };
        ViewSummary {
            loaded: self.items.len(),
            visible: self.visible_items().len(),
            hidden_completed,
        }
    }
}
