#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mentor driving-behavior export parsing.
//!
//! Mentor exports are spreadsheets whose layout drifts between vendor
//! template revisions and locales. Parsing runs in three steps:
//!
//! 1. [`header::locate_header`] finds the header row, if any
//! 2. [`mapping::build_column_mapping`] resolves every field to a column
//! 3. [`transform::transform_rows`] reads the data rows into
//!    [`DriverRecord`](dsp_quality_models::DriverRecord)s

pub mod header;
pub mod mapping;
pub mod transform;

use dsp_quality_models::{MentorReport, ReportPeriod, TabularRow};

pub use header::locate_header;
pub use mapping::{ColumnMapping, build_column_mapping};
pub use transform::transform_rows;

/// Parses the rows of a mentor export into a weekly report.
#[must_use]
pub fn parse_mentor_rows(rows: &[TabularRow], file_name: &str, period: ReportPeriod) -> MentorReport {
    let header = locate_header(rows);
    let mapping = build_column_mapping(header);
    let drivers = transform_rows(rows, header, &mapping);

    if drivers.is_empty() {
        log::warn!("No drivers found in mentor export '{file_name}'");
    } else {
        log::info!(
            "Parsed {} drivers from mentor export '{file_name}' ({period})",
            drivers.len()
        );
    }

    MentorReport {
        week: period.week,
        year: period.year,
        file_name: file_name.to_owned(),
        drivers,
    }
}

#[cfg(test)]
mod tests {
    use dsp_quality_models::{MentorField, MetricValue};

    use super::*;

    #[test]
    fn parses_german_export() {
        let rows = vec![
            TabularRow::new(0)
                .with_text("A", "Fahrer")
                .with_text("D", "Station")
                .with_text("E", "Fahrten")
                .with_text("V", "Tempo"),
            TabularRow::new(1)
                .with_text("A", "A2B3C4D5E6F7G8")
                .with_text("D", "DSU1")
                .with_number("E", 87.0)
                .with_number("N", 6.0),
        ];
        let report = parse_mentor_rows(&rows, "Mentor_2025-03-02.xlsx", ReportPeriod::new(10, 2025));

        assert_eq!(report.week, 10);
        assert_eq!(report.year, 2025);
        assert_eq!(report.drivers.len(), 1);
        let driver = &report.drivers[0];
        assert_eq!(driver.metric(MentorField::TotalTrips), Some(&MetricValue::Number(87.0)));
        assert_eq!(driver.metric(MentorField::Speeding), Some(&MetricValue::from("High Risk")));
    }

    #[test]
    fn parses_english_excel_export() {
        let rows = dsp_quality_document::tabular::read_excel(include_bytes!(
            "../../document/fixtures/mentor_week10.xlsx"
        ))
        .unwrap();
        let report = parse_mentor_rows(&rows, "mentor_week10.xlsx", ReportPeriod::new(10, 2025));

        assert_eq!(report.drivers.len(), 2);
        let first = &report.drivers[0];
        assert_eq!(first.name, "A13JMD0G4ND0QP");
        let metric = |field| first.metric(field).cloned();
        assert_eq!(metric(MentorField::DriverLastName), Some(MetricValue::from("Schmidt")));
        assert_eq!(metric(MentorField::OverallRating), Some(MetricValue::from("845")));
        assert_eq!(metric(MentorField::TotalTrips), Some(MetricValue::Number(87.0)));
        assert_eq!(metric(MentorField::TotalDriverKm), Some(MetricValue::Number(1234.5)));
        assert_eq!(metric(MentorField::TotalHours), Some(MetricValue::from("08:30")));
        assert_eq!(metric(MentorField::Acceleration), Some(MetricValue::from("Low Risk")));
        assert_eq!(metric(MentorField::Braking), Some(MetricValue::from("Medium Risk")));
        assert_eq!(metric(MentorField::Cornering), Some(MetricValue::from("-")));
        assert_eq!(metric(MentorField::Speeding), Some(MetricValue::from("High Risk")));
        assert_eq!(metric(MentorField::FollowingDistance), Some(MetricValue::from("Low Risk")));

        let second = &report.drivers[1];
        assert_eq!(
            second.metric(MentorField::Station),
            Some(&MetricValue::from("UNASSIGNED"))
        );
        assert_eq!(
            second.metric(MentorField::TotalHours),
            Some(&MetricValue::Number(8.5))
        );
        assert_eq!(
            second.metric(MentorField::PhoneDistraction),
            Some(&MetricValue::from("High Risk"))
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let rows = vec![
            TabularRow::new(0).with_text("A", "First Name"),
            TabularRow::new(1).with_text("A", "A1").with_text("D", "DSU1"),
            TabularRow::new(2).with_text("A", "A2").with_number("H", 1.0),
        ];
        let period = ReportPeriod::new(3, 2025);
        let a = parse_mentor_rows(&rows, "m.xlsx", period);
        let b = parse_mentor_rows(&rows, "m.xlsx", period);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
