//! Scorecard output schema.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Headline status derived from the overall score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum OverallStatus {
    /// Score of 95 or above.
    Fantastic,
    /// Score of 85 or above.
    Great,
    /// Score of 75 or above, or no score at all.
    Fair,
    /// Anything below 75.
    Poor,
}

/// Status of a single KPI against its target.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KpiStatus {
    /// Best band.
    Fantastic,
    /// Second band.
    Great,
    /// Third band.
    Fair,
    /// Below all bands.
    Poor,
    /// Breach of contract reported.
    #[serde(rename = "not in compliance")]
    #[strum(serialize = "not in compliance")]
    NotInCompliance,
    /// Nothing to report.
    None,
}

/// A company-level KPI line from the scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyKpi {
    /// KPI name as printed in the report.
    pub name: String,
    /// Reported value.
    pub value: f64,
    /// Target value.
    pub target: f64,
    /// Unit (`%`, `DPMO`, or empty).
    pub unit: String,
    /// Status band.
    pub status: KpiStatus,
}

/// One metric of a driver KPI row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverMetric {
    /// Metric name (`Delivered`, `DCR`, ...).
    pub name: String,
    /// Reported value.
    pub value: f64,
    /// Target value.
    pub target: f64,
    /// Unit (`%`, `DPMO`, or empty).
    pub unit: String,
    /// Status band.
    pub status: KpiStatus,
}

/// A driver row from the scorecard's driver table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverKpi {
    /// Anonymised transporter ID.
    pub name: String,
    /// Per-metric values.
    pub metrics: Vec<DriverMetric>,
}

/// Where the recommended focus areas came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FocusAreaProvenance {
    /// Items found below a focus-area header on page 2.
    HeaderSection,
    /// Items found in a vertical cluster near the bottom of page 2.
    ProximityCluster,
    /// Known KPI names found in the page 2 text.
    KeywordScanPage2,
    /// Known KPI names found in the page 1 text.
    KeywordScanPage1,
    /// Fixed default list; nothing was extracted.
    Default,
}

/// Recommended focus areas plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreas {
    /// Between one and three focus areas.
    pub areas: Vec<String>,
    /// Extraction stage that produced `areas`.
    pub provenance: FocusAreaProvenance,
}

impl FocusAreas {
    /// Returns `true` if the areas are the synthetic default list.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.provenance == FocusAreaProvenance::Default
    }
}

/// Normalized scorecard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCardData {
    /// Reporting week.
    pub week: u32,
    /// Reporting year.
    pub year: i32,
    /// Station code, when one was found.
    pub location: Option<String>,
    /// Headline score, when one was found.
    pub overall_score: Option<f64>,
    /// Status derived from the score.
    pub overall_status: OverallStatus,
    /// Station rank, when one was found.
    pub rank: Option<u32>,
    /// Human readable rank change.
    pub rank_note: String,
    /// Company-level KPIs.
    #[serde(rename = "companyKPIs")]
    pub company_kpis: Vec<CompanyKpi>,
    /// Per-driver KPIs.
    #[serde(rename = "driverKPIs")]
    pub driver_kpis: Vec<DriverKpi>,
    /// At most three recommended focus areas.
    pub recommended_focus_areas: Vec<String>,
    /// Set by the normalizer; `false` for extracted data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sample_data: Option<bool>,
}
