//! Localised labels and badges for kinds and item types, and relative-date wording.

use lab_types::Locale;

use crate::model::{ItemKind, ItemType};
use crate::status::{Badge, BadgeTone};

pub fn kind_label(kind: &ItemKind, locale: Locale) -> String {
    let label = match (kind, locale) {
        (ItemKind::Assignment, Locale::Es) => "Asignación",
        (ItemKind::Assignment, Locale::En) => "Assignment",
        (ItemKind::Review, Locale::Es) => "Revisión",
        (ItemKind::Review, Locale::En) => "Review",
        (ItemKind::Other(raw), _) => raw.as_str(),
    };
    label.to_string()
}

pub fn kind_badge(kind: &ItemKind, locale: Locale) -> Badge {
    let tone = match kind {
        ItemKind::Assignment => BadgeTone::Blue,
        ItemKind::Review => BadgeTone::Purple,
        ItemKind::Other(_) => BadgeTone::Neutral,
    };
    Badge::new(kind_label(kind, locale), tone)
}

pub fn item_type_label(item_type: &ItemType, locale: Locale) -> String {
    let label = match (item_type, locale) {
        (ItemType::LabOrder, Locale::Es) => "Orden",
        (ItemType::LabOrder, Locale::En) => "Order",
        (ItemType::Sample, Locale::Es) => "Muestra",
        (ItemType::Sample, Locale::En) => "Sample",
        (ItemType::Report, Locale::Es) => "Informe",
        (ItemType::Report, Locale::En) => "Report",
        (ItemType::Other(raw), _) => raw.as_str(),
    };
    label.to_string()
}

pub fn item_type_badge(item_type: &ItemType, locale: Locale) -> Badge {
    let tone = match item_type {
        ItemType::LabOrder => BadgeTone::Gold,
        ItemType::Sample => BadgeTone::Cyan,
        ItemType::Report => BadgeTone::Magenta,
        ItemType::Other(_) => BadgeTone::Neutral,
    };
    Badge::new(item_type_label(item_type, locale), tone)
}

/// Elapsed time, already bucketed into the unit it should be shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elapsed {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
}

pub fn elapsed_label(elapsed: Elapsed, locale: Locale) -> String {
    match (elapsed, locale) {
        (Elapsed::JustNow, Locale::Es) => "Ahora".to_string(),
        (Elapsed::JustNow, Locale::En) => "now".to_string(),
        (Elapsed::Minutes(n), Locale::Es) => format!("Hace {n} min"),
        (Elapsed::Minutes(n), Locale::En) => format!("{n} min ago"),
        (Elapsed::Hours(n), Locale::Es) => format!("Hace {n} h"),
        (Elapsed::Hours(n), Locale::En) => format!("{n}h ago"),
        (Elapsed::Days(n), Locale::Es) => format!("Hace {n} d"),
        (Elapsed::Days(n), Locale::En) => format!("{n}d ago"),
    }
}
