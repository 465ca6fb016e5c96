//! Mentor rows to driver records.

use std::sync::LazyLock;

use dsp_quality_models::{
    CellValue, DriverRecord, MentorField, MetricValue, RiskRating, TabularRow, deduplicate_drivers,
};
use regex::Regex;

use crate::mapping::ColumnMapping;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("valid regex"));
static PLAIN_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"));
static ANONYMISED_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9+/=]+$").expect("valid regex"));
static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex"));

/// Hours values above this are exported in seconds.
const SECONDS_THRESHOLD: f64 = 1000.0;

fn rating_for(value: f64) -> Option<RiskRating> {
    if value == 0.0 {
        Some(RiskRating::None)
    } else if value > 0.0 && value <= 3.0 {
        Some(RiskRating::Low)
    } else if value > 3.0 && value <= 5.0 {
        Some(RiskRating::Medium)
    } else if value > 5.0 {
        Some(RiskRating::High)
    } else {
        None
    }
}

/// Normalizes a risk metric cell.
///
/// Numeric event counts map to bands, text ratings to the matching band;
/// anything unrecognized is carried through as text.
#[must_use]
pub fn risk_rating(cell: &CellValue) -> MetricValue {
    match cell {
        CellValue::Empty => RiskRating::None.into(),
        CellValue::Number(n) => {
            rating_for(*n).map_or_else(|| MetricValue::Text(cell.to_text()), MetricValue::from)
        }
        CellValue::Text(text) => {
            let lower = text.trim().to_lowercase();
            if lower.is_empty() || lower == "-" || lower == "n/a" {
                return RiskRating::None.into();
            }
            if PLAIN_NUMBER_RE.is_match(&lower) {
                if let Some(rating) = lower.parse().ok().and_then(rating_for) {
                    return rating.into();
                }
            }
            if lower.contains("low") {
                RiskRating::Low.into()
            } else if lower.contains("med") {
                RiskRating::Medium.into()
            } else if lower.contains("high") {
                RiskRating::High.into()
            } else {
                log::debug!("Unrecognized risk value '{text}'");
                MetricValue::Text(text.trim().to_owned())
            }
        }
    }
}

/// Extracts a number from a cell, `0` when there is none.
///
/// Anonymised IDs (alphanumeric, longer than ten characters) are not
/// mined for digits.
#[must_use]
pub fn numeric_value(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Empty => 0.0,
        CellValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() || text == "-" || text.eq_ignore_ascii_case("n/a") {
                return 0.0;
            }
            if text.len() > 10 && ANONYMISED_ID_RE.is_match(text) {
                log::debug!("Skipping numeric extraction for ID-like value '{text}'");
                return 0.0;
            }
            NUMBER_RE
                .find(text)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or_else(|| {
                    log::debug!("No numeric value in '{text}'");
                    0.0
                })
        }
    }
}

/// Normalizes total hours: `HH:MM` stays text, seconds become hours.
#[must_use]
pub fn total_hours(cell: &CellValue) -> MetricValue {
    if let Some(text) = cell.as_str() {
        if text.contains(':') {
            return MetricValue::Text(text.trim().to_owned());
        }
    }
    let value = numeric_value(cell);
    if value > SECONDS_THRESHOLD {
        MetricValue::Number((value / 3600.0 * 100.0).round() / 100.0)
    } else {
        MetricValue::Number(value)
    }
}

/// Overall rating digits, `Unknown` when the cell is empty.
#[must_use]
pub fn overall_rating(cell: &CellValue) -> String {
    let text = cell.to_text();
    if text.is_empty() {
        return "Unknown".to_owned();
    }
    RATING_RE
        .find(&text)
        .map_or(text.clone(), |m| m.as_str().replace(',', "."))
}

/// Station name with every unassigned variant collapsed to `UNASSIGNED`.
#[must_use]
pub fn station(cell: &CellValue) -> String {
    let text = cell.to_text();
    if text.to_uppercase().contains("UNASSIGNED") {
        "UNASSIGNED".to_owned()
    } else {
        text
    }
}

fn is_repeated_header(first_name: &str) -> bool {
    first_name.to_lowercase().contains("first")
}

/// Converts data rows to driver records.
///
/// Data starts below the header row, or at row index 1 when there is no
/// header. Blank rows and repeated header rows are skipped. Duplicate
/// drivers are dropped, keeping the first row.
#[must_use]
pub fn transform_rows(
    rows: &[TabularRow],
    header: Option<&TabularRow>,
    mapping: &ColumnMapping,
) -> Vec<DriverRecord> {
    let first_data_row = header.map_or(1, |h| h.index + 1);
    let cell = |row: &TabularRow, field: MentorField| row.get(mapping.column(field)).clone();

    let mut skipped = 0usize;
    let records: Vec<DriverRecord> = rows
        .iter()
        .filter(|row| row.index >= first_data_row)
        .filter_map(|row| {
            let name = cell(row, MentorField::DriverFirstName).to_text();
            let last_name = cell(row, MentorField::DriverLastName).to_text();
            let station_cell = cell(row, MentorField::Station);

            if (name.is_empty() && last_name.is_empty() && station_cell.is_empty())
                || is_repeated_header(&name)
            {
                skipped += 1;
                return None;
            }

            let mut record = DriverRecord::new(name);
            let mut put = |field: MentorField, value: MetricValue| {
                record.metrics.insert(field.to_string(), value);
            };
            put(MentorField::DriverLastName, last_name.into());
            put(MentorField::Station, station(&station_cell).into());
            put(
                MentorField::OverallRating,
                overall_rating(&cell(row, MentorField::OverallRating)).into(),
            );
            put(
                MentorField::TotalTrips,
                numeric_value(&cell(row, MentorField::TotalTrips)).into(),
            );
            put(
                MentorField::TotalDriverKm,
                numeric_value(&cell(row, MentorField::TotalDriverKm)).into(),
            );
            put(
                MentorField::TotalHours,
                total_hours(&cell(row, MentorField::TotalHours)),
            );
            for field in MentorField::RISK {
                put(field, risk_rating(&cell(row, field)));
            }

            Some(record)
        })
        .collect();

    if skipped > 0 {
        log::debug!("Skipped {skipped} blank or header rows");
    }

    deduplicate_drivers(records)
}

#[cfg(test)]
mod tests {
    use crate::mapping::build_column_mapping;

    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_owned())
    }

    #[test]
    fn risk_ratings_from_numbers() {
        assert_eq!(risk_rating(&CellValue::Number(0.0)), MetricValue::from("-"));
        assert_eq!(risk_rating(&CellValue::Number(2.5)), MetricValue::from("Low Risk"));
        assert_eq!(risk_rating(&CellValue::Number(3.0)), MetricValue::from("Low Risk"));
        assert_eq!(risk_rating(&CellValue::Number(4.0)), MetricValue::from("Medium Risk"));
        assert_eq!(risk_rating(&CellValue::Number(5.5)), MetricValue::from("High Risk"));
        assert_eq!(risk_rating(&text("5")), MetricValue::from("Medium Risk"));
    }

    #[test]
    fn risk_ratings_from_text() {
        assert_eq!(risk_rating(&text("LOW RISK")), MetricValue::from("Low Risk"));
        assert_eq!(risk_rating(&text("Medium")), MetricValue::from("Medium Risk"));
        assert_eq!(risk_rating(&text("high")), MetricValue::from("High Risk"));
        assert_eq!(risk_rating(&text("n/a")), MetricValue::from("-"));
        assert_eq!(risk_rating(&CellValue::Empty), MetricValue::from("-"));
        assert_eq!(risk_rating(&text("Coaching")), MetricValue::from("Coaching"));
    }

    #[test]
    fn numeric_values() {
        assert!((numeric_value(&text("1.234 km")) - 1.234).abs() < f64::EPSILON);
        assert!((numeric_value(&text("-3")) + 3.0).abs() < f64::EPSILON);
        assert!(numeric_value(&text("A1B2C3D4E5F6G7")).abs() < f64::EPSILON);
        assert!(numeric_value(&text("-")).abs() < f64::EPSILON);
        assert!(numeric_value(&text("none")).abs() < f64::EPSILON);
    }

    #[test]
    fn hours_keep_clock_format_and_convert_seconds() {
        assert_eq!(total_hours(&text("38:15")), MetricValue::from("38:15"));
        assert_eq!(total_hours(&CellValue::Number(36_000.0)), MetricValue::Number(10.0));
        assert_eq!(total_hours(&CellValue::Number(7_380.0)), MetricValue::Number(2.05));
        assert_eq!(total_hours(&CellValue::Number(40.0)), MetricValue::Number(40.0));
    }

    #[test]
    fn overall_rating_and_station() {
        assert_eq!(overall_rating(&text("FICO 812")), "812");
        assert_eq!(overall_rating(&CellValue::Number(790.0)), "790");
        assert_eq!(overall_rating(&CellValue::Empty), "Unknown");
        assert_eq!(station(&text("DSU1 - unassigned")), "UNASSIGNED");
        assert_eq!(station(&text("DSU1")), "DSU1");
    }

    #[test]
    fn transforms_rows_below_header() {
        let header = TabularRow::new(1)
            .with_text("A", "Driver#")
            .with_text("D", "Station");
        let rows = vec![
            TabularRow::new(0).with_text("A", "Mentor Weekly"),
            header.clone(),
            TabularRow::new(2)
                .with_text("A", "A1B2C3D4E5F6G7")
                .with_text("B", "X")
                .with_number("C", 845.0)
                .with_text("D", "DSU1")
                .with_number("E", 120.0)
                .with_number("F", 1_530.5)
                .with_text("G", "38:15")
                .with_number("H", 4.0)
                .with_text("V", "low"),
            TabularRow::new(3),
            TabularRow::new(4).with_text("A", "Driver First Name"),
            TabularRow::new(5)
                .with_text("A", "A1B2C3D4E5F6G7")
                .with_text("D", "DSU2"),
        ];
        let mapping = build_column_mapping(Some(&header));
        let records = transform_rows(&rows, Some(&header), &mapping);

        assert_eq!(records.len(), 1);
        let driver = &records[0];
        assert_eq!(driver.name, "A1B2C3D4E5F6G7");
        assert_eq!(driver.metric(MentorField::Station), Some(&MetricValue::from("DSU1")));
        assert_eq!(driver.metric(MentorField::OverallRating), Some(&MetricValue::from("845")));
        assert_eq!(driver.metric(MentorField::TotalTrips), Some(&MetricValue::Number(120.0)));
        assert_eq!(driver.metric(MentorField::TotalDriverKm), Some(&MetricValue::Number(1_530.5)));
        assert_eq!(driver.metric(MentorField::TotalHours), Some(&MetricValue::from("38:15")));
        assert_eq!(driver.metric(MentorField::Acceleration), Some(&MetricValue::from("Medium Risk")));
        assert_eq!(driver.metric(MentorField::Seatbelt), Some(&MetricValue::from("Low Risk")));
        assert_eq!(driver.metric(MentorField::Braking), Some(&MetricValue::from("-")));
    }

    #[test]
    fn headerless_data_starts_at_second_row() {
        let rows = vec![
            TabularRow::new(0).with_text("A", "A0000000000000").with_text("D", "X"),
            TabularRow::new(1).with_text("A", "A1111111111111").with_text("D", "Y"),
        ];
        let mapping = build_column_mapping(None);
        let records = transform_rows(&rows, None, &mapping);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "A1111111111111");
    }
}
