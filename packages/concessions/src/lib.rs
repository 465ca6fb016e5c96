#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Concessions export parsing.
//!
//! The export is a single sheet with a header row followed by one row per
//! concession. Columns are found by header text; rows are grouped by their
//! `WKnn` week and the current week is picked from the file name or the
//! data.

pub mod columns;
pub mod week;

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use dsp_quality_models::{CellValue, ConcessionItem, ConcessionsReport, ReasonSummary, TabularRow};

pub use columns::{ConcessionColumns, detect_columns};
pub use week::{determine_current_week, normalize_week, week_from_file_name};

/// Reason reported for concessions without one.
pub const UNKNOWN_REASON: &str = "Unbekannt";

static EMPTY: CellValue = CellValue::Empty;

fn cell<'a>(row: &'a TabularRow, column: Option<&String>) -> &'a CellValue {
    column.map_or(&EMPTY, |c| row.get(c))
}

/// Renders a spreadsheet date serial as an ISO 8601 timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let timestamp = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;
    Some(timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

fn delivery_date(value: &CellValue) -> String {
    match value {
        CellValue::Number(serial) => {
            excel_serial_to_iso(*serial).unwrap_or_else(|| value.to_text())
        }
        _ => value.to_text(),
    }
}

fn cost(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Text(text) => text.trim().replace(',', ".").parse().unwrap_or(0.0),
        CellValue::Empty => 0.0,
    }
}

/// Parses concessions rows. The first row is the header.
///
/// Missing required columns are logged and read as empty values.
#[must_use]
pub fn parse_concessions_rows(rows: &[TabularRow], file_name: &str) -> ConcessionsReport {
    let Some((header, data)) = rows.split_first() else {
        log::warn!("Concessions file '{file_name}' has no rows");
        return ConcessionsReport {
            current_week: None,
            items: vec![],
            weeks: BTreeMap::new(),
        };
    };

    let columns = detect_columns(header);
    let missing = columns.missing();
    if !missing.is_empty() {
        log::warn!("Concessions file '{file_name}' is missing columns: {missing:?}");
    }

    let data: Vec<&TabularRow> = data.iter().filter(|row| !row.is_blank()).collect();

    let row_weeks: Vec<Option<String>> = data
        .iter()
        .map(|row| {
            columns
                .week
                .as_ref()
                .and_then(|c| normalize_week(&row.text(c)))
        })
        .collect();
    let seen_weeks: Vec<String> = row_weeks.iter().flatten().cloned().collect();
    let current_week = determine_current_week(file_name, &seen_weeks);

    let mut weeks: BTreeMap<String, Vec<ConcessionItem>> = BTreeMap::new();
    for (row, row_week) in data.iter().zip(row_weeks) {
        let week = if columns.week.is_some() {
            let Some(week) = row_week else {
                continue;
            };
            week
        } else {
            match &current_week {
                Some(week) => week.clone(),
                None => continue,
            }
        };

        let item = ConcessionItem {
            transport_id: cell(row, columns.transport_id.as_ref()).to_text(),
            tracking_id: cell(row, columns.tracking_id.as_ref()).to_text(),
            delivery_date_time: delivery_date(cell(row, columns.delivery_date.as_ref())),
            reason: cell(row, columns.reason.as_ref()).to_text(),
            cost: cost(cell(row, columns.cost.as_ref())),
        };
        weeks.entry(week).or_default().push(item);
    }

    let items = current_week
        .as_ref()
        .and_then(|w| weeks.get(w))
        .cloned()
        .unwrap_or_default();

    log::info!(
        "Parsed {} concessions across {} weeks from '{file_name}', {} in the current week",
        weeks.values().map(Vec::len).sum::<usize>(),
        weeks.len(),
        items.len()
    );

    ConcessionsReport {
        current_week,
        items,
        weeks,
    }
}

/// Groups items by reason, most frequent first.
#[must_use]
pub fn group_by_reason(items: &[ConcessionItem]) -> Vec<ReasonSummary> {
    let mut groups: BTreeMap<&str, ReasonSummary> = BTreeMap::new();
    for item in items {
        let reason = item.reason.trim();
        let reason = if reason.is_empty() { UNKNOWN_REASON } else { reason };
        let summary = groups.entry(reason).or_insert_with(|| ReasonSummary {
            reason: reason.to_owned(),
            count: 0,
            total_cost: 0.0,
        });
        summary.count += 1;
        summary.total_cost += item.cost;
    }

    let mut summaries: Vec<ReasonSummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> TabularRow {
        TabularRow::new(0)
            .with_text("A", "Week")
            .with_text("B", "transporter_id")
            .with_text("C", "tracking_id")
            .with_text("D", "delivery_date_time")
            .with_text("E", "shipment_reason")
            .with_text("F", "Concession Cost")
    }

    fn row(index: usize, week: &str, id: &str, reason: &str, cost: f64) -> TabularRow {
        TabularRow::new(index)
            .with_text("A", week)
            .with_text("B", id)
            .with_text("C", &format!("TRK{index}"))
            .with_number("D", 45_731.5)
            .with_text("E", reason)
            .with_number("F", cost)
    }

    #[test]
    fn splits_rows_by_week() {
        let rows = vec![
            header(),
            row(1, "10", "A1", "DNR", 12.5),
            row(2, "11", "A2", "DNR", 20.0),
            row(3, "11", "A3", "", 7.5),
            TabularRow::new(4),
            row(5, "", "A4", "DNR", 1.0),
        ];
        let report = parse_concessions_rows(&rows, "concessions.xlsx");

        assert_eq!(report.current_week.as_deref(), Some("WK11"));
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.available_weeks(), vec!["WK11", "WK10"]);
        assert!((report.total_cost() - 27.5).abs() < f64::EPSILON);
        assert_eq!(report.items[0].tracking_id, "TRK2");
        assert_eq!(report.items[0].delivery_date_time, "2025-03-15T12:00:00.000Z");
    }

    #[test]
    fn file_name_week_wins() {
        let rows = vec![header(), row(1, "10", "A1", "DNR", 12.5), row(2, "11", "A2", "DNR", 1.0)];
        let report = parse_concessions_rows(&rows, "Concessions_KW10.xlsx");
        assert_eq!(report.current_week.as_deref(), Some("WK10"));
        assert_eq!(report.items.len(), 1);
    }

    #[test]
    fn without_week_column_everything_is_current() {
        let rows = vec![
            TabularRow::new(0)
                .with_text("A", "Tracking ID")
                .with_text("B", "Kosten"),
            TabularRow::new(1).with_text("A", "TRK1").with_text("B", "3,5"),
        ];
        let report = parse_concessions_rows(&rows, "concessions wk7.csv");
        assert_eq!(report.current_week.as_deref(), Some("WK07"));
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].transport_id, "");
        assert!((report.items[0].cost - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reasons_are_grouped() {
        let rows = vec![
            header(),
            row(1, "11", "A1", "DNR", 10.0),
            row(2, "11", "A2", "", 5.0),
            row(3, "11", "A3", "DNR", 2.5),
        ];
        let report = parse_concessions_rows(&rows, "c.xlsx");
        let groups = group_by_reason(&report.items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].reason, "DNR");
        assert_eq!(groups[0].count, 2);
        assert!((groups[0].total_cost - 12.5).abs() < f64::EPSILON);
        assert_eq!(groups[1].reason, UNKNOWN_REASON);
    }

    #[test]
    fn empty_sheet() {
        let report = parse_concessions_rows(&[], "c.xlsx");
        assert_eq!(report.current_week, None);
        assert!(report.weeks.is_empty());
    }
}
