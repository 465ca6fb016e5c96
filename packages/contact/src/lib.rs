#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Customer contact compliance report parsing.
//!
//! The report is an HTML page with one table: a header row followed by one
//! row per driver with the transporter ID, the number of addresses that
//! required a contact, the contacts made, and the compliance percentage.
//! The percentage is taken as printed.

use std::{collections::BTreeMap, sync::LazyLock};

use dsp_quality_models::{
    ComplianceRow, ComplianceStatistics, CustomerContactReport, ReportPeriod,
};
use scraper::{ElementRef, Html, Selector};

/// Rows below this percentage are critical.
pub const CRITICAL_BELOW: f64 = 85.0;

/// Rows at or above this percentage are good.
pub const GOOD_FROM: f64 = 98.0;

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("valid selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid selector"));

/// Compliance band of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceBand {
    /// Below 85%.
    Critical,
    /// From 85% up to 98%.
    NeedsImprovement,
    /// 98% or above.
    Good,
}

impl ComplianceBand {
    /// Band of a percentage.
    #[must_use]
    pub fn of(percentage: f64) -> Self {
        if percentage < CRITICAL_BELOW {
            Self::Critical
        } else if percentage < GOOD_FROM {
            Self::NeedsImprovement
        } else {
            Self::Good
        }
    }
}

fn cell_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join("").trim().to_owned()
}

fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

fn parse_percentage(text: &str) -> f64 {
    text.replace('%', "").replace(',', ".").trim().parse().unwrap_or(0.0)
}

/// Parses the driver rows of a compliance report.
///
/// `names` maps transporter IDs to display names. Unknown drivers are named
/// `Unknown Driver (<id>)` with the first name `Driver`.
#[must_use]
pub fn parse_compliance_html(html: &str, names: &BTreeMap<String, String>) -> Vec<ComplianceRow> {
    let document = Html::parse_document(html);

    let rows: Vec<ComplianceRow> = document
        .select(&ROW_SELECTOR)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&CELL_SELECTOR).map(|c| cell_text(&c)).collect();
            if cells.len() < 4 {
                return None;
            }

            let transporter_id = cells[0].clone();
            let (driver_name, first_name) = names.get(&transporter_id).map_or_else(
                || (format!("Unknown Driver ({transporter_id})"), "Driver".to_owned()),
                |name| {
                    let first = name.split_whitespace().next().unwrap_or("Driver");
                    (name.clone(), first.to_owned())
                },
            );

            Some(ComplianceRow {
                transporter_id,
                driver_name,
                first_name,
                total_addresses: parse_count(&cells[1]),
                total_contacts: parse_count(&cells[2]),
                percentage: parse_percentage(&cells[3]),
            })
        })
        .collect();

    if rows.is_empty() {
        log::warn!("No compliance rows found in HTML report");
    } else {
        log::debug!("Parsed {} compliance rows", rows.len());
    }

    rows
}

/// Aggregates compliance rows. All values are zero for no rows.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compliance_statistics(rows: &[ComplianceRow]) -> ComplianceStatistics {
    if rows.is_empty() {
        return ComplianceStatistics::default();
    }

    let mut stats = ComplianceStatistics {
        total_drivers: rows.len(),
        ..ComplianceStatistics::default()
    };
    let mut percentage_sum = 0.0;

    for row in rows {
        percentage_sum += row.percentage;
        stats.total_addresses += u64::from(row.total_addresses);
        stats.total_contacts += u64::from(row.total_contacts);
        match ComplianceBand::of(row.percentage) {
            ComplianceBand::Critical => stats.critical += 1,
            ComplianceBand::NeedsImprovement => stats.needs_improvement += 1,
            ComplianceBand::Good => stats.good += 1,
        }
    }

    stats.average_percentage = percentage_sum / rows.len() as f64;
    stats.missed_contacts = stats.total_addresses.saturating_sub(stats.total_contacts);
    stats
}

/// Drivers below the good threshold, lowest percentage first.
#[must_use]
pub fn drivers_needing_contact(rows: &[ComplianceRow]) -> Vec<&ComplianceRow> {
    let mut below: Vec<&ComplianceRow> = rows.iter().filter(|r| r.percentage < GOOD_FROM).collect();
    below.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
    below
}

/// Reminder message for a driver below the good threshold.
#[must_use]
pub fn driver_message(row: &ComplianceRow) -> String {
    let missed = row.total_addresses.saturating_sub(row.total_contacts);
    format!(
        "Hi {}, letzte Woche musstest du {} Kunden kontaktieren, hast aber nur {} kontaktiert ({missed} fehlende Kontakte). Bitte versuch diese Woche auf 100% zu kommen.",
        row.first_name, row.total_addresses, row.total_contacts
    )
}

/// Parses a compliance report into a weekly record.
#[must_use]
pub fn parse_customer_contact_report(
    html: &str,
    names: &BTreeMap<String, String>,
    period: ReportPeriod,
) -> CustomerContactReport {
    let rows = parse_compliance_html(html, names);
    let statistics = compliance_statistics(&rows);

    log::info!(
        "Customer contact {period}: {} drivers, average {:.2}%",
        statistics.total_drivers,
        statistics.average_percentage
    );

    CustomerContactReport {
        week: period.week,
        year: period.year,
        rows,
        statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r"
        <h1>DE-MASC-DSU1 Contact Compliance Report 2025-11</h1>
        <table>
          <tr><th>Transporter ID</th><th>Total Addresses</th><th>Total Contacts</th><th>Contact Compliance</th></tr>
          <tr><td>A13JMD0G4ND0QP</td><td>1</td><td>0</td><td>0.00%</td></tr>
          <tr><td>A3K5L8S7OQ1XTO</td><td>14</td><td>12</td><td>85.71%</td></tr>
          <tr><td>A1926P63C7L1MX</td><td>104</td><td>102</td><td> 98.08 % </td></tr>
          <tr><td>incomplete</td><td>3</td></tr>
        </table>
    ";

    fn names() -> BTreeMap<String, String> {
        BTreeMap::from([("A3K5L8S7OQ1XTO".to_owned(), "Thomas Schäfer".to_owned())])
    }

    #[test]
    fn parses_rows_after_header() {
        let rows = parse_compliance_html(REPORT, &names());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].transporter_id, "A13JMD0G4ND0QP");
        assert_eq!(rows[0].driver_name, "Unknown Driver (A13JMD0G4ND0QP)");
        assert_eq!(rows[0].first_name, "Driver");

        assert_eq!(rows[1].driver_name, "Thomas Schäfer");
        assert_eq!(rows[1].first_name, "Thomas");
        assert_eq!(rows[1].total_addresses, 14);
        assert_eq!(rows[1].total_contacts, 12);
        assert!((rows[1].percentage - 85.71).abs() < f64::EPSILON);

        assert!((rows[2].percentage - 98.08).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_is_not_recomputed() {
        let html = "<table><tr><th>h</th></tr><tr><td>A1</td><td>3</td><td>1</td><td>50%</td></tr></table>";
        let rows = parse_compliance_html(html, &BTreeMap::new());
        assert!((rows[0].percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn statistics() {
        let rows = parse_compliance_html(REPORT, &names());
        let stats = compliance_statistics(&rows);
        assert_eq!(stats.total_drivers, 3);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.needs_improvement, 1);
        assert_eq!(stats.good, 1);
        assert_eq!(stats.total_addresses, 119);
        assert_eq!(stats.total_contacts, 114);
        assert_eq!(stats.missed_contacts, 5);
        assert!((stats.average_percentage - (0.0 + 85.71 + 98.08) / 3.0).abs() < 1e-9);

        assert_eq!(compliance_statistics(&[]), ComplianceStatistics::default());
    }

    #[test]
    fn contact_list_and_message() {
        let rows = parse_compliance_html(REPORT, &names());
        let needing = drivers_needing_contact(&rows);
        assert_eq!(needing.len(), 2);
        assert_eq!(needing[0].transporter_id, "A13JMD0G4ND0QP");

        let message = driver_message(needing[1]);
        assert!(message.starts_with("Hi Thomas,"));
        assert!(message.contains("(2 fehlende Kontakte)"));
    }

    #[test]
    fn builds_weekly_report() {
        let report = parse_customer_contact_report(REPORT, &names(), ReportPeriod::new(11, 2025));
        assert_eq!(report.week, 11);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.statistics.total_drivers, 3);
    }
}
