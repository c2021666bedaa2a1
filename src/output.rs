//! Terminal output for the worklist.
//!
//! Human-readable table for interactive use, JSON for scripting. Both take already rendered
//! rows; nothing here decides which items are visible.

use serde::Serialize;
use worklist_core::{Facets, Locale, PageMeta, ViewSummary, WorklistRow};

/// JSON output structure for one worklist paint.
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub locale: Locale,
    pub summary: ViewSummary,
    pub page: Option<PageMeta>,
    pub rows: &'a [WorklistRow],
}

pub fn format_json(
    rows: &[WorklistRow],
    summary: ViewSummary,
    page: Option<PageMeta>,
    locale: Locale,
) -> String {
    let output = JsonOutput {
        locale,
        summary,
        page,
        rows,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

struct Headings {
    id: &'static str,
    date: &'static str,
    patient: &'static str,
    item_type: &'static str,
    kind: &'static str,
    status: &'static str,
    order: &'static str,
}

fn headings(locale: Locale) -> Headings {
    match locale {
        Locale::Es => Headings {
            id: "ID",
            date: "Asignado",
            patient: "Paciente",
            item_type: "Tipo",
            kind: "Motivo",
            status: "Estado",
            order: "Orden",
        },
        Locale::En => Headings {
            id: "ID",
            date: "Assigned",
            patient: "Patient",
            item_type: "Type",
            kind: "Kind",
            status: "Status",
            order: "Order",
        },
    }
}

/// Message for a successful load that produced no rows.
pub fn empty_message(summary: ViewSummary, locale: Locale) -> &'static str {
    match (summary.loaded == 0, locale) {
        (true, Locale::Es) => "No tienes elementos pendientes.",
        (true, Locale::En) => "Your worklist is empty.",
        (false, Locale::Es) => "Ningún elemento coincide con los filtros.",
        (false, Locale::En) => "No items match the current filters.",
    }
}

/// Formats rows as an aligned table followed by summary counts.
pub fn format_human(rows: &[WorklistRow], summary: ViewSummary, locale: Locale) -> String {
    if rows.is_empty() {
        let mut output = empty_message(summary, locale).to_string();
        output.push('\n');
        output.push_str(&summary_line(summary, locale));
        return output;
    }

    let h = headings(locale);
    let header = [h.id, h.date, h.patient, h.item_type, h.kind, h.status, h.order]
        .map(str::to_string)
        .to_vec();
    let body: Vec<Vec<String>> = rows.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = header.iter().map(|c| c.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut output, &rule, &widths);
    for cells in &body {
        push_line(&mut output, cells, &widths);
    }
    output.push('\n');
    output.push_str(&summary_line(summary, locale));
    output
}

fn row_cells(row: &WorklistRow) -> Vec<String> {
    let date = match &row.date.relative {
        Some(relative) => format!("{} ({})", row.date.absolute, relative),
        None => row.date.absolute.clone(),
    };
    let patient = match &row.patient {
        worklist_core::PatientCell::Known {
            initials,
            name,
            code: Some(code),
        } => format!("[{initials}] {name} · {code}"),
        worklist_core::PatientCell::Known { initials, name, .. } => {
            format!("[{initials}] {name}")
        }
        missing => missing.display_name().to_string(),
    };
    vec![
        row.display_id.clone(),
        date,
        patient,
        row.type_badge.label.clone(),
        row.kind_badge.label.clone(),
        row.status_badge.label.clone(),
        row.order_code
            .clone()
            .unwrap_or_else(|| worklist_core::constants::PLACEHOLDER.to_string()),
    ]
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    output.push_str(padded.join("  ").trim_end());
    output.push('\n');
}

fn summary_line(summary: ViewSummary, locale: Locale) -> String {
    let mut line = match locale {
        Locale::Es => format!("Mostrando {} de {}", summary.visible, summary.loaded),
        Locale::En => format!("Showing {} of {}", summary.visible, summary.loaded),
    };
    if summary.hidden_completed > 0 {
        line.push_str(&match locale {
            Locale::Es => format!(" ({} completados ocultos)", summary.hidden_completed),
            Locale::En => format!(" ({} completed hidden)", summary.hidden_completed),
        });
    }
    line
}

/// Filter sidebar: the facet options available for the loaded items, with the current
/// status selection marked.
pub fn format_sidebar(facets: &Facets, selected_statuses: &[String], locale: Locale) -> String {
    let (kinds, types, statuses, patients) = match locale {
        Locale::Es => ("Motivo", "Tipo", "Estado", "Paciente"),
        Locale::En => ("Kind", "Type", "Status", "Patient"),
    };

    let mut output = String::new();
    for (title, options) in [
        (kinds, &facets.kinds),
        (types, &facets.item_types),
        (patients, &facets.patients),
    ] {
        if options.is_empty() {
            continue;
        }
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        output.push_str(&format!("{title}: {}\n", labels.join(", ")));
    }
    if !facets.statuses.is_empty() {
        let labels: Vec<String> = facets
            .statuses
            .iter()
            .map(|o| {
                let mark = if selected_statuses.contains(&o.value) { "x" } else { " " };
                format!("[{mark}] {}", o.label)
            })
            .collect();
        output.push_str(&format!("{statuses}: {}\n", labels.join(" ")));
    }
    output
}

/// Show only the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklist_core::{Badge, BadgeTone, DateCell, FacetOption, PatientCell};

    fn row(display_id: &str, patient: PatientCell) -> WorklistRow {
        WorklistRow {
            id: "1".into(),
            display_id: display_id.into(),
            date: DateCell {
                absolute: "19/10/2026 10:00".into(),
                relative: Some("Hace 5 min".into()),
            },
            patient,
            type_badge: Badge::new("Orden", BadgeTone::Gold),
            kind_badge: Badge::new("Asignación", BadgeTone::Blue),
            status_badge: Badge::new("Recibida", BadgeTone::Blue),
            order_code: None,
            link: "/orders/1".into(),
        }
    }

    fn summary(loaded: usize, visible: usize, hidden_completed: usize) -> ViewSummary {
        ViewSummary {
            loaded,
            visible,
            hidden_completed,
        }
    }

    #[test]
    fn empty_worklist_and_filtered_out_differ() {
        let empty = format_human(&[], summary(0, 0, 0), Locale::En);
        let filtered = format_human(&[], summary(3, 0, 3), Locale::En);
        assert!(empty.starts_with("Your worklist is empty."));
        assert!(filtered.starts_with("No items match the current filters."));
        assert!(filtered.contains("(3 completed hidden)"));
    }

    #[test]
    fn table_aligns_columns_and_uses_placeholders() {
        let rows = vec![
            row(
                "ORD-1",
                PatientCell::Known {
                    initials: "AP".into(),
                    name: "Ana Pérez".into(),
                    code: Some("P-001".into()),
                },
            ),
            row("ORD-22", PatientCell::Missing),
        ];
        let text = format_human(&rows, summary(2, 2, 0), Locale::Es);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("ID      Asignado"));
        assert!(lines[2].contains("[AP] Ana Pérez · P-001"));
        assert!(lines[2].contains("19/10/2026 10:00 (Hace 5 min)"));
        assert!(lines[3].contains("—"));
        assert_eq!(lines.last().copied(), Some("Mostrando 2 de 2"));
    }

    #[test]
    fn json_output_carries_rows_and_summary() {
        let rows = vec![row("ORD-1", PatientCell::Missing)];
        let json = format_json(&rows, summary(1, 1, 0), None, Locale::Es);
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["locale"], "es");
        assert_eq!(value["summary"]["visible"], 1);
        assert_eq!(value["rows"][0]["display_id"], "ORD-1");
        assert_eq!(value["rows"][0]["patient"]["state"], "missing");
    }

    #[test]
    fn sidebar_marks_selected_statuses() {
        let facets = Facets {
            statuses: vec![
                FacetOption {
                    value: "RECEIVED".into(),
                    label: "Received".into(),
                },
                FacetOption {
                    value: "RELEASED".into(),
                    label: "Released".into(),
                },
            ],
            ..Facets::default()
        };
        let text = format_sidebar(&facets, &["RECEIVED".to_string()], Locale::En);
        assert_eq!(text, "Status: [x] Received [ ] Released\n");
    }

    #[test]
    fn token_is_masked_except_tail() {
        assert_eq!(mask_token("abcdef123"), "*****f123");
        assert_eq!(mask_token("abc"), "***");
    }
}
