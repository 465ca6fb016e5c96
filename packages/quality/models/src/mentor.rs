//! Mentor driving-behavior types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Semantic field of a mentor export.
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
    EnumIter,
)]
pub enum MentorField {
    /// Anonymised transporter ID in the first-name column.
    #[serde(rename = "Driver First Name")]
    #[strum(serialize = "Driver First Name")]
    DriverFirstName,
    #[serde(rename = "Driver Last Name")]
    #[strum(serialize = "Driver Last Name")]
    DriverLastName,
    #[serde(rename = "Overall Rating")]
    #[strum(serialize = "Overall Rating")]
    OverallRating,
    #[serde(rename = "Station")]
    #[strum(serialize = "Station")]
    Station,
    #[serde(rename = "Total Trips")]
    #[strum(serialize = "Total Trips")]
    TotalTrips,
    #[serde(rename = "Total Driver km")]
    #[strum(serialize = "Total Driver km")]
    TotalDriverKm,
    #[serde(rename = "Total Hours")]
    #[strum(serialize = "Total Hours")]
    TotalHours,
    #[serde(rename = "Acceleration")]
    #[strum(serialize = "Acceleration")]
    Acceleration,
    #[serde(rename = "Braking")]
    #[strum(serialize = "Braking")]
    Braking,
    #[serde(rename = "Cornering")]
    #[strum(serialize = "Cornering")]
    Cornering,
    #[serde(rename = "Speeding")]
    #[strum(serialize = "Speeding")]
    Speeding,
    #[serde(rename = "Seatbelt")]
    #[strum(serialize = "Seatbelt")]
    Seatbelt,
    #[serde(rename = "Following Distance")]
    #[strum(serialize = "Following Distance")]
    FollowingDistance,
    #[serde(rename = "Phone Distraction")]
    #[strum(serialize = "Phone Distraction")]
    PhoneDistraction,
}

impl MentorField {
    /// Fields every mentor record requires.
    pub const REQUIRED: [Self; 12] = [
        Self::DriverFirstName,
        Self::DriverLastName,
        Self::OverallRating,
        Self::Station,
        Self::TotalTrips,
        Self::TotalDriverKm,
        Self::TotalHours,
        Self::Acceleration,
        Self::Braking,
        Self::Cornering,
        Self::Speeding,
        Self::Seatbelt,
    ];

    /// Fields reported as a [`RiskRating`].
    pub const RISK: [Self; 7] = [
        Self::Acceleration,
        Self::Braking,
        Self::Cornering,
        Self::Speeding,
        Self::Seatbelt,
        Self::FollowingDistance,
        Self::PhoneDistraction,
    ];

    /// Returns `true` if the field is reported as a risk rating.
    #[must_use]
    pub fn is_risk(self) -> bool {
        Self::RISK.contains(&self)
    }
}

/// Risk band of a driving-behavior metric.
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
pub enum RiskRating {
    /// No events or no data.
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    None,
    #[serde(rename = "Low Risk")]
    #[strum(serialize = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    #[strum(serialize = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    #[strum(serialize = "High Risk")]
    High,
}

/// Value of a single driver metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric value.
    Number(f64),
    /// Textual value (ratings, `HH:MM` durations, names).
    Text(String),
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<RiskRating> for MetricValue {
    fn from(value: RiskRating) -> Self {
        Self::Text(value.to_string())
    }
}

/// One driver with named metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// Driver identifier; unique within a report.
    pub name: String,
    /// Metrics keyed by field name.
    pub metrics: BTreeMap<String, MetricValue>,
}

impl DriverRecord {
    /// Creates a record without metrics.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: BTreeMap::new(),
        }
    }

    /// Returns the metric stored for `field`.
    #[must_use]
    pub fn metric(&self, field: MentorField) -> Option<&MetricValue> {
        self.metrics.get(field.as_ref())
    }
}

/// Weekly mentor report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorReport {
    /// Reporting week.
    pub week: u32,
    /// Reporting year.
    pub year: i32,
    /// Source file name.
    pub file_name: String,
    /// Deduplicated driver records.
    pub drivers: Vec<DriverRecord>,
}
