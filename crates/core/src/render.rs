//! Row rendering.
//!
//! Turns one [`WorklistItem`] into a [`WorklistRow`]: everything a table needs to paint the
//! row, already localised. Rendering never fails; missing or unknown values become
//! placeholders or neutral badges.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use lab_types::Locale;
use serde::Serialize;

use crate::constants::PLACEHOLDER;
use crate::labels::{elapsed_label, item_type_badge, kind_badge, Elapsed};
use crate::model::{non_blank, WorklistItem};
use crate::status::Badge;

const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
const RELATIVE_LIMIT_DAYS: i64 = 7;

/// Inputs shared by every row of one paint.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub locale: Locale,
    /// Offset absolute dates are displayed in.
    pub offset: FixedOffset,
}

impl RenderContext {
    pub fn new(now: DateTime<Utc>, locale: Locale, offset: FixedOffset) -> Self {
        Self {
            now,
            locale,
            offset,
        }
    }

    /// Context displaying absolute dates in UTC.
    pub fn utc(now: DateTime<Utc>, locale: Locale) -> Self {
        Self::new(now, locale, Utc.fix())
    }
}

// ============================================================================
// Cells
// ============================================================================

/// Assignment date. `absolute` is always present; `relative` only for the last week.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateCell {
    pub absolute: String,
    pub relative: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PatientCell {
    Known {
        initials: String,
        name: String,
        code: Option<String>,
    },
    Missing,
}

impl PatientCell {
    pub fn display_name(&self) -> &str {
        match self {
            PatientCell::Known { name, .. } => name.as_str(),
            PatientCell::Missing => PLACEHOLDER,
        }
    }
}

/// One painted worklist row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorklistRow {
    pub id: String,
    pub display_id: String,
    pub date: DateCell,
    pub patient: PatientCell,
    pub type_badge: Badge,
    pub kind_badge: Badge,
    pub status_badge: Badge,
    pub order_code: Option<String>,
    /// Where activating the row navigates to.
    pub link: String,
}

pub fn render_row(item: &WorklistItem, ctx: &RenderContext) -> WorklistRow {
    WorklistRow {
        id: item.id.clone(),
        display_id: non_blank(Some(item.display_id.as_str()))
            .unwrap_or(PLACEHOLDER)
            .to_string(),
        date: date_cell(item.assigned_at_utc(), ctx),
        patient: patient_cell(item),
        type_badge: item_type_badge(&item.item_type, ctx.locale),
        kind_badge: kind_badge(&item.kind, ctx.locale),
        status_badge: item.status().badge(ctx.locale),
        order_code: non_blank(item.order_code.as_deref()).map(str::to_string),
        link: item.link.clone(),
    }
}

pub fn date_cell(assigned_at: Option<DateTime<Utc>>, ctx: &RenderContext) -> DateCell {
    match assigned_at {
        Some(at) => DateCell {
            absolute: format_absolute(at, ctx),
            relative: relative_label(at, ctx.now, ctx.locale),
        },
        None => DateCell {
            absolute: PLACEHOLDER.to_string(),
            relative: None,
        },
    }
}

pub fn format_absolute(at: DateTime<Utc>, ctx: &RenderContext) -> String {
    let local = at.with_timezone(&ctx.offset);
    match ctx.locale {
        Locale::Es => local.format("%d/%m/%Y %H:%M").to_string(),
        Locale::En => local.format("%Y-%m-%d %H:%M").to_string(),
    }
}

/// Bucket the time between `at` and `now`.
///
/// Minutes are floored. Timestamps in the future count as "just now". Returns `None` from
/// seven days on, where only the absolute date is shown.
pub fn elapsed_since(at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Elapsed> {
    let minutes = (now - at).num_milliseconds().div_euclid(60_000);
    if minutes < 1 {
        return Some(Elapsed::JustNow);
    }
    if minutes < MINUTES_PER_HOUR {
        return Some(Elapsed::Minutes(minutes));
    }
    let hours = minutes / MINUTES_PER_HOUR;
    if hours < HOURS_PER_DAY {
        return Some(Elapsed::Hours(hours));
    }
    let days = hours / HOURS_PER_DAY;
    if days < RELATIVE_LIMIT_DAYS {
        return Some(Elapsed::Days(days));
    }
    None
}

pub fn relative_label(at: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> Option<String> {
    elapsed_since(at, now).map(|elapsed| elapsed_label(elapsed, locale))
}

fn patient_cell(item: &WorklistItem) -> PatientCell {
    let Some(name) = non_blank(item.patient_name.as_deref()) else {
        return PatientCell::Missing;
    };
    PatientCell::Known {
        initials: initials(name),
        name: name.to_string(),
        code: non_blank(item.patient_code.as_deref()).map(str::to_string),
    }
}

/// Avatar initials: first letter of the first two words, upper-cased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
