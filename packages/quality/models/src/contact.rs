//! Customer contact compliance types.

use serde::{Deserialize, Serialize};

/// One driver row of the customer contact report.
///
/// `percentage` is carried verbatim from the report and is not recomputed
/// from the two totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRow {
    /// Anonymised transporter ID.
    pub transporter_id: String,
    /// Display name, or `Unknown Driver (<id>)`.
    pub driver_name: String,
    /// First word of a known name, or `Driver`.
    pub first_name: String,
    /// Addresses that required a contact.
    pub total_addresses: u32,
    /// Contacts made.
    pub total_contacts: u32,
    /// Compliance percentage as printed.
    pub percentage: f64,
}

/// Aggregate view over a set of compliance rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatistics {
    /// Mean of the row percentages.
    pub average_percentage: f64,
    /// Number of rows.
    pub total_drivers: usize,
    /// Rows below 85%.
    pub critical: usize,
    /// Rows from 85% up to but excluding 98%.
    pub needs_improvement: usize,
    /// Rows at 98% or above.
    pub good: usize,
    /// Sum of addresses.
    pub total_addresses: u64,
    /// Sum of contacts.
    pub total_contacts: u64,
    /// Addresses without a contact.
    pub missed_contacts: u64,
}

/// Weekly customer contact report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContactReport {
    /// Reporting week.
    pub week: u32,
    /// Reporting year.
    pub year: i32,
    /// Parsed rows in report order.
    pub rows: Vec<ComplianceRow>,
    /// Statistics over `rows`.
    pub statistics: ComplianceStatistics,
}
