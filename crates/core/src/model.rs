//! Worklist wire models.
//!
//! A worklist item is one unit of pending work for the signed-in user: either an
//! *assignment* (the user works on the entity) or a *review* (the user must approve it).
//! Each item wraps one domain entity: a lab order, a sample or a report.
//!
//! The backend vocabulary evolves independently of this client, so every closed set here
//! carries a fallback variant that preserves the raw wire value instead of failing to
//! deserialise.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::status::ItemStatus;

// ============================================================================
// Kind and item type
// ============================================================================

/// Why the item is on the user's worklist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// The user is assigned to work on the entity.
    Assignment,
    /// The user is a required reviewer or approver of the entity.
    Review,
    /// A kind this client does not know about yet.
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Assignment => "assignment",
            ItemKind::Review => "review",
            ItemKind::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ItemKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "assignment" => ItemKind::Assignment,
            "review" => ItemKind::Review,
            _ => ItemKind::Other(raw),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The domain entity an item wraps.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    LabOrder,
    Sample,
    Report,
    /// An entity type this client does not know about yet.
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::LabOrder => "lab_order",
            ItemType::Sample => "sample",
            ItemType::Report => "report",
            ItemType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ItemType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "lab_order" => ItemType::LabOrder,
            "sample" => ItemType::Sample,
            "report" => ItemType::Report,
            _ => ItemType::Other(raw),
        }
    }
}

impl From<ItemType> for String {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Worklist item
// ============================================================================

/// One pending unit of work, exactly as the backend returned it.
///
/// Items are read-only on the client. Identifiers are kept as strings; numeric identifiers
/// on the wire are accepted and converted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub kind: ItemKind,

    pub item_type: ItemType,

    #[serde(default, deserialize_with = "nullable_string_or_number")]
    pub item_id: String,

    /// Human-facing code of the entity (for example an order code).
    #[serde(default, deserialize_with = "nullable_string")]
    pub display_id: String,

    /// Raw domain status. Its vocabulary depends on `item_type`; see [`WorklistItem::status`].
    #[serde(default, deserialize_with = "nullable_string")]
    pub item_status: String,

    /// ISO 8601 timestamp of the assignment. Kept raw so unparsable values still round-trip.
    #[serde(default, deserialize_with = "nullable_string")]
    pub assigned_at: String,

    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub patient_id: Option<String>,

    #[serde(default)]
    pub patient_name: Option<String>,

    #[serde(default)]
    pub patient_code: Option<String>,

    /// Order reference for samples and reports.
    #[serde(default)]
    pub order_code: Option<String>,

    /// Application path of the entity's detail view, trusted verbatim.
    #[serde(default, deserialize_with = "nullable_string")]
    pub link: String,
}

impl WorklistItem {
    /// Resolve the raw status against the vocabulary of this item's type.
    pub fn status(&self) -> ItemStatus {
        ItemStatus::resolve(&self.item_type, &self.item_status)
    }

    /// Parsed `assigned_at`, or `None` when it is missing or unparsable.
    ///
    /// RFC 3339 is expected; offset-less timestamps are read as UTC.
    pub fn assigned_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.assigned_at)
    }

    /// The patient associated with this item, if any.
    ///
    /// An item counts as having a patient when the backend sent a non-blank `patient_id`.
    pub fn patient(&self) -> Option<PatientRef<'_>> {
        let id = non_blank(self.patient_id.as_deref())?;
        Some(PatientRef {
            id,
            name: non_blank(self.patient_name.as_deref()),
            code: non_blank(self.patient_code.as_deref()),
        })
    }
}

/// Borrowed view of an item's patient association.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatientRef<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub code: Option<&'a str>,
}

impl<'a> PatientRef<'a> {
    /// Best available label: name, then code, then id.
    pub fn display_name(&self) -> &'a str {
        self.name.or(self.code).unwrap_or(self.id)
    }
}

/// Response body of `GET /v1/me/worklist`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistPage {
    #[serde(default)]
    pub items: Vec<WorklistItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub has_more: bool,
}

fn first_page() -> u32 {
    1
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// `null` reads as an empty string, like a missing key.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn nullable_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_string_or_number(deserializer).map(Option::unwrap_or_default)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
