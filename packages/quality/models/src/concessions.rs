//! Concessions (delivery refund) types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single concession line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionItem {
    /// Transporter ID of the driver.
    pub transport_id: String,
    /// Package tracking ID.
    pub tracking_id: String,
    /// Delivery date and time as printed.
    pub delivery_date_time: String,
    /// Concession reason.
    pub reason: String,
    /// Cost of the concession.
    pub cost: f64,
}

/// Concessions grouped by reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonSummary {
    /// Reason text, or `Unbekannt`.
    pub reason: String,
    /// Number of items.
    pub count: usize,
    /// Summed cost.
    pub total_cost: f64,
}

/// Concessions for one upload, split by week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionsReport {
    /// Normalised current week (`WKnn`), if any week was found.
    pub current_week: Option<String>,
    /// Items of the current week.
    pub items: Vec<ConcessionItem>,
    /// All items keyed by normalised week.
    pub weeks: BTreeMap<String, Vec<ConcessionItem>>,
}

impl ConcessionsReport {
    /// Weeks present in the report, newest first.
    #[must_use]
    pub fn available_weeks(&self) -> Vec<String> {
        let mut weeks: Vec<String> = self.weeks.keys().cloned().collect();
        weeks.sort_by_key(|w| std::cmp::Reverse(week_number(w)));
        weeks
    }

    /// Total cost of the current week.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.items.iter().map(|i| i.cost).sum()
    }
}

/// Numeric part of a `WKnn` label.
#[must_use]
pub fn week_number(label: &str) -> u32 {
    label
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_weeks_are_newest_first() {
        let mut weeks = BTreeMap::new();
        weeks.insert("WK09".to_owned(), vec![]);
        weeks.insert("WK11".to_owned(), vec![]);
        weeks.insert("WK10".to_owned(), vec![]);
        let report = ConcessionsReport {
            current_week: Some("WK11".to_owned()),
            items: vec![],
            weeks,
        };
        assert_eq!(report.available_weeks(), vec!["WK11", "WK10", "WK09"]);
    }
}
