#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for the DSP quality ingestion pipeline.
//!
//! Every pipeline stage produces an immutable value defined here and hands
//! it to the next stage. The report types ([`ScoreCardData`],
//! [`MentorReport`], [`CustomerContactReport`], [`ConcessionsReport`]) are
//! the only contract the storage layer and UI depend on.

pub mod concessions;
pub mod contact;
pub mod document;
pub mod drivers;
pub mod mentor;
pub mod scorecard;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use concessions::{ConcessionItem, ConcessionsReport, ReasonSummary};
pub use contact::{ComplianceRow, ComplianceStatistics, CustomerContactReport};
pub use document::{CellValue, DocumentKind, PdfPage, PositionalItem, RawDocument, TabularRow};
pub use drivers::{DriverIdentity, deduplicate_drivers};
pub use mentor::{DriverRecord, MentorField, MentorReport, MetricValue, RiskRating};
pub use scorecard::{
    CompanyKpi, DriverKpi, DriverMetric, FocusAreaProvenance, FocusAreas, KpiStatus,
    OverallStatus, ScoreCardData,
};

/// Kind of weekly quality report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportCategory {
    /// Weekly DSP scorecard (PDF).
    Scorecard,
    /// Mentor driving-behavior export (Excel/CSV).
    Mentor,
    /// Customer contact compliance report (HTML).
    CustomerContact,
    /// Concessions export (Excel/CSV).
    Concessions,
}

impl ReportCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [
        Self::Scorecard,
        Self::Mentor,
        Self::CustomerContact,
        Self::Concessions,
    ];
}

/// ISO reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// ISO week number (1-53).
    pub week: u32,
    /// ISO week-based year.
    pub year: i32,
}

impl ReportPeriod {
    /// Creates a new period.
    #[must_use]
    pub const fn new(week: u32, year: i32) -> Self {
        Self { week, year }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KW{:02}/{}", self.week, self.year)
    }
}

/// One entry of the upload history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHistoryEntry {
    /// Uploaded file name.
    pub name: String,
    /// Kind of the uploaded file.
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Upload time.
    pub timestamp: DateTime<Utc>,
    /// Report category the file was ingested as.
    pub category: ReportCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_kebab_case() {
        assert_eq!(ReportCategory::CustomerContact.to_string(), "customer-contact");
        assert_eq!(
            "concessions".parse::<ReportCategory>().unwrap(),
            ReportCategory::Concessions
        );
    }

    #[test]
    fn period_displays_as_calendar_week() {
        assert_eq!(ReportPeriod::new(7, 2025).to_string(), "KW07/2025");
    }
}
