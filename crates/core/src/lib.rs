//! # Worklist Core
//!
//! Client-side data shaping for the laboratory worklist:
//! - Wire models for worklist items and pages ([`model`])
//! - Per item type status vocabularies and badges ([`status`])
//! - Filter facets derived from the loaded items ([`facets`])
//! - Free-text search, column filters and sorting ([`filter`], [`sort`])
//! - Row rendering with relative dates ([`render`])
//! - Page state with sequence-stamped fetches ([`view`])
//! - Injected session configuration and its persisted part ([`config`], [`session`])
//!
//! **No transport concerns**: HTTP lives in `worklist-client`. Everything here is synchronous
//! and deterministic given its inputs, including "now".

pub mod config;
pub mod constants;
pub mod error;
pub mod facets;
pub mod filter;
pub mod labels;
pub mod model;
pub mod render;
pub mod session;
pub mod sort;
pub mod status;
pub mod view;

pub use config::SessionConfig;
pub use error::{WorklistError, WorklistResult};
pub use facets::{FacetOption, Facets};
pub use filter::{apply, matches_search, ColumnFilters, Criteria, StatusFilter};
pub use model::{ItemKind, ItemType, PatientRef, WorklistItem, WorklistPage};
pub use render::{render_row, DateCell, PatientCell, RenderContext, WorklistRow};
pub use session::{PersistedSession, SessionStore};
pub use sort::{SortKey, SortOrder, SortSpec};
pub use status::{Badge, BadgeTone, ItemStatus, OrderStatus, ReportStatus, SampleStatus};
pub use view::{FetchTicket, LoadState, PageMeta, ViewSummary, WorklistView};

pub use lab_types::{Locale, NonEmptyText};
