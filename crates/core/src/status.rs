//! Status vocabularies and badges.
//!
//! Each item type has its own closed status vocabulary. The raw status is resolved against
//! the vocabulary of the item's type into [`ItemStatus`]; anything that does not resolve is
//! kept as [`ItemStatus::Unrecognised`] and renders as a neutral badge carrying the raw
//! string. Resolution never fails.

use lab_types::Locale;
use serde::Serialize;

use crate::constants::COMPLETED_STATUSES;
use crate::model::ItemType;

// ============================================================================
// Badges
// ============================================================================

/// Colour family of a badge. `Neutral` is the gray fallback for unknown values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Neutral,
    Blue,
    Cyan,
    Purple,
    Magenta,
    Orange,
    Gold,
    Green,
    Red,
}

/// A rendered badge: text plus colour family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }

    /// Gray badge showing the raw value as-is.
    pub fn neutral(raw: &str) -> Self {
        Self::new(raw, BadgeTone::Neutral)
    }
}

// ============================================================================
// Vocabularies
// ============================================================================

/// Lab order lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Received,
    Processing,
    Diagnosis,
    Review,
    Released,
    Closed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Received,
        OrderStatus::Processing,
        OrderStatus::Diagnosis,
        OrderStatus::Review,
        OrderStatus::Released,
        OrderStatus::Closed,
        OrderStatus::Cancelled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Diagnosis => "DIAGNOSIS",
            OrderStatus::Review => "REVIEW",
            OrderStatus::Released => "RELEASED",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|status| status.code() == key)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (OrderStatus::Received, Locale::Es) => "Recibida",
            (OrderStatus::Received, Locale::En) => "Received",
            (OrderStatus::Processing, Locale::Es) => "En proceso",
            (OrderStatus::Processing, Locale::En) => "Processing",
            (OrderStatus::Diagnosis, Locale::Es) => "Diagnóstico",
            (OrderStatus::Diagnosis, Locale::En) => "Diagnosis",
            (OrderStatus::Review, Locale::Es) => "En revisión",
            (OrderStatus::Review, Locale::En) => "In review",
            (OrderStatus::Released, Locale::Es) => "Liberada",
            (OrderStatus::Released, Locale::En) => "Released",
            (OrderStatus::Closed, Locale::Es) => "Cerrada",
            (OrderStatus::Closed, Locale::En) => "Closed",
            (OrderStatus::Cancelled, Locale::Es) => "Cancelada",
            (OrderStatus::Cancelled, Locale::En) => "Cancelled",
        }
    }

    pub fn tone(self) -> BadgeTone {
        match self {
            OrderStatus::Received => BadgeTone::Blue,
            OrderStatus::Processing => BadgeTone::Cyan,
            OrderStatus::Diagnosis => BadgeTone::Purple,
            OrderStatus::Review => BadgeTone::Orange,
            OrderStatus::Released => BadgeTone::Green,
            OrderStatus::Closed => BadgeTone::Neutral,
            OrderStatus::Cancelled => BadgeTone::Red,
        }
    }
}

/// Physical sample state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleStatus {
    Received,
    Processing,
    Ready,
    Damaged,
    Cancelled,
}

impl SampleStatus {
    pub const ALL: [SampleStatus; 5] = [
        SampleStatus::Received,
        SampleStatus::Processing,
        SampleStatus::Ready,
        SampleStatus::Damaged,
        SampleStatus::Cancelled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SampleStatus::Received => "RECEIVED",
            SampleStatus::Processing => "PROCESSING",
            SampleStatus::Ready => "READY",
            SampleStatus::Damaged => "DAMAGED",
            SampleStatus::Cancelled => "CANCELLED",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|status| status.code() == key)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (SampleStatus::Received, Locale::Es) => "Recibida",
            (SampleStatus::Received, Locale::En) => "Received",
            (SampleStatus::Processing, Locale::Es) => "En proceso",
            (SampleStatus::Processing, Locale::En) => "Processing",
            (SampleStatus::Ready, Locale::Es) => "Lista",
            (SampleStatus::Ready, Locale::En) => "Ready",
            (SampleStatus::Damaged, Locale::Es) => "Dañada",
            (SampleStatus::Damaged, Locale::En) => "Damaged",
            (SampleStatus::Cancelled, Locale::Es) => "Cancelada",
            (SampleStatus::Cancelled, Locale::En) => "Cancelled",
        }
    }

    pub fn tone(self) -> BadgeTone {
        match self {
            SampleStatus::Received => BadgeTone::Blue,
            SampleStatus::Processing => BadgeTone::Cyan,
            SampleStatus::Ready => BadgeTone::Green,
            SampleStatus::Damaged => BadgeTone::Orange,
            SampleStatus::Cancelled => BadgeTone::Red,
        }
    }
}

/// Report lifecycle, plus the review-decision states reviewers see on their worklist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    Draft,
    InReview,
    Approved,
    Published,
    Retracted,
    Pending,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 7] = [
        ReportStatus::Draft,
        ReportStatus::InReview,
        ReportStatus::Approved,
        ReportStatus::Published,
        ReportStatus::Retracted,
        ReportStatus::Pending,
        ReportStatus::Rejected,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ReportStatus::Draft => "DRAFT",
            ReportStatus::InReview => "IN_REVIEW",
            ReportStatus::Approved => "APPROVED",
            ReportStatus::Published => "PUBLISHED",
            ReportStatus::Retracted => "RETRACTED",
            ReportStatus::Pending => "PENDING",
            ReportStatus::Rejected => "REJECTED",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|status| status.code() == key)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ReportStatus::Draft, Locale::Es) => "Borrador",
            (ReportStatus::Draft, Locale::En) => "Draft",
            (ReportStatus::InReview, Locale::Es) => "En revisión",
            (ReportStatus::InReview, Locale::En) => "In review",
            (ReportStatus::Approved, Locale::Es) => "Aprobado",
            (ReportStatus::Approved, Locale::En) => "Approved",
            (ReportStatus::Published, Locale::Es) => "Publicado",
            (ReportStatus::Published, Locale::En) => "Published",
            (ReportStatus::Retracted, Locale::Es) => "Retractado",
            (ReportStatus::Retracted, Locale::En) => "Retracted",
            (ReportStatus::Pending, Locale::Es) => "Pendiente",
            (ReportStatus::Pending, Locale::En) => "Pending",
            (ReportStatus::Rejected, Locale::Es) => "Rechazado",
            (ReportStatus::Rejected, Locale::En) => "Rejected",
        }
    }

    pub fn tone(self) -> BadgeTone {
        match self {
            ReportStatus::Draft => BadgeTone::Neutral,
            ReportStatus::InReview => BadgeTone::Orange,
            ReportStatus::Approved => BadgeTone::Green,
            ReportStatus::Published => BadgeTone::Blue,
            ReportStatus::Retracted => BadgeTone::Red,
            ReportStatus::Pending => BadgeTone::Gold,
            ReportStatus::Rejected => BadgeTone::Red,
        }
    }
}

// ============================================================================
// Resolved status
// ============================================================================

/// A raw status resolved against its item type's vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Order(OrderStatus),
    Sample(SampleStatus),
    Report(ReportStatus),
    /// The status is not part of the item type's vocabulary, or the item type is unknown.
    Unrecognised(String),
}

impl ItemStatus {
    pub fn resolve(item_type: &ItemType, raw: &str) -> Self {
        let resolved = match item_type {
            ItemType::LabOrder => OrderStatus::parse(raw).map(ItemStatus::Order),
            ItemType::Sample => SampleStatus::parse(raw).map(ItemStatus::Sample),
            ItemType::Report => ReportStatus::parse(raw).map(ItemStatus::Report),
            ItemType::Other(_) => None,
        };
        resolved.unwrap_or_else(|| ItemStatus::Unrecognised(raw.to_string()))
    }

    pub fn code(&self) -> &str {
        match self {
            ItemStatus::Order(status) => status.code(),
            ItemStatus::Sample(status) => status.code(),
            ItemStatus::Report(status) => status.code(),
            ItemStatus::Unrecognised(raw) => raw.as_str(),
        }
    }

    pub fn badge(&self, locale: Locale) -> Badge {
        match self {
            ItemStatus::Order(status) => Badge::new(status.label(locale), status.tone()),
            ItemStatus::Sample(status) => Badge::new(status.label(locale), status.tone()),
            ItemStatus::Report(status) => Badge::new(status.label(locale), status.tone()),
            ItemStatus::Unrecognised(raw) => Badge::neutral(raw),
        }
    }
}

/// Label for a raw status without knowing its item type.
///
/// Used for filter options, which mix statuses from every item type. The status is
/// upper-cased for lookup; statuses shared between vocabularies (`RECEIVED`, `PROCESSING`,
/// `CANCELLED`) carry the same label in each. Unknown statuses return the raw string.
pub fn status_label(raw: &str, locale: Locale) -> String {
    if let Some(status) = OrderStatus::parse(raw) {
        return status.label(locale).to_string();
    }
    if let Some(status) = SampleStatus::parse(raw) {
        return status.label(locale).to_string();
    }
    if let Some(status) = ReportStatus::parse(raw) {
        return status.label(locale).to_string();
    }
    raw.to_string()
}

/// Whether a raw status means the work is done and should be hidden by default.
pub fn is_completed_status(raw: &str) -> bool {
    let key = raw.trim().to_ascii_uppercase();
    COMPLETED_STATUSES.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_are_resolved_per_item_type() {
        assert_eq!(
            ItemStatus::resolve(&ItemType::LabOrder, "DIAGNOSIS"),
            ItemStatus::Order(OrderStatus::Diagnosis)
        );
        // READY is a sample state, not an order state.
        assert_eq!(
            ItemStatus::resolve(&ItemType::LabOrder, "READY"),
            ItemStatus::Unrecognised("READY".into())
        );
        assert_eq!(
            ItemStatus::resolve(&ItemType::Sample, "ready"),
            ItemStatus::Sample(SampleStatus::Ready)
        );
        assert_eq!(
            ItemStatus::resolve(&ItemType::Report, "PENDING"),
            ItemStatus::Report(ReportStatus::Pending)
        );
    }

    #[test]
    fn unknown_status_renders_neutral_badge_with_raw_label() {
        let status = ItemStatus::resolve(&ItemType::Report, "FOO_UNKNOWN");
        let badge = status.badge(Locale::Es);
        assert_eq!(badge.tone, BadgeTone::Neutral);
        assert_eq!(badge.label, "FOO_UNKNOWN");
    }

    #[test]
    fn unknown_item_type_never_resolves() {
        let status = ItemStatus::resolve(&ItemType::Other("invoice".into()), "RECEIVED");
        assert_eq!(status, ItemStatus::Unrecognised("RECEIVED".into()));
        assert_eq!(status.badge(Locale::En), Badge::neutral("RECEIVED"));
    }

    #[test]
    fn every_vocabulary_entry_round_trips_through_parse() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.code()), Some(status));
        }
        for status in SampleStatus::ALL {
            assert_eq!(SampleStatus::parse(status.code()), Some(status));
        }
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::parse(status.code()), Some(status));
        }
    }

    #[test]
    fn status_label_upper_cases_for_lookup() {
        assert_eq!(status_label("released", Locale::En), "Released");
        assert_eq!(status_label("IN_REVIEW", Locale::Es), "En revisión");
        assert_eq!(status_label("on_hold", Locale::Es), "on_hold");
    }

    #[test]
    fn completed_set_is_closed() {
        for raw in ["APPROVED", "ready", "Released", "CLOSED", "PUBLISHED"] {
            assert!(is_completed_status(raw), "{raw} should be completed");
        }
        for raw in ["RECEIVED", "PROCESSING", "CANCELLED", "DRAFT", "PENDING", ""] {
            assert!(!is_completed_status(raw), "{raw} should not be completed");
        }
    }
}
