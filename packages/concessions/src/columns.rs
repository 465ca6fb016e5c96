//! Header-based column detection.

use dsp_quality_document::column_index;
use dsp_quality_models::TabularRow;

const WEEK_PATTERNS: &[&str] = &["wk", "week", "kw", "kalenderwoche"];
const TRANSPORT_ID_PATTERNS: &[&str] = &[
    "transporter_id",
    "transport id",
    "transport-id",
    "transport_id",
    "transportid",
];
const TRACKING_ID_PATTERNS: &[&str] = &[
    "tracking_id",
    "tracking id",
    "tracking-id",
    "trackingid",
];
const DELIVERY_DATE_PATTERNS: &[&str] = &[
    "delivery_date_time",
    "delivery date",
    "delivery-date",
    "delivery_date",
    "deliverydate",
    "datum",
];
const REASON_PATTERNS: &[&str] = &[
    "shipment_reason",
    "shipment reason",
    "reason code",
    "reason",
    "grund",
];
const COST_PATTERNS: &[&str] = &["concession cost", "cost", "kosten", "amount"];

/// Column letters of the concessions fields, where found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcessionColumns {
    pub week: Option<String>,
    pub transport_id: Option<String>,
    pub tracking_id: Option<String>,
    pub delivery_date: Option<String>,
    pub reason: Option<String>,
    pub cost: Option<String>,
}

impl ConcessionColumns {
    /// Names of the required columns that were not found. The week column
    /// is optional.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (&self.transport_id, "Transport ID"),
            (&self.tracking_id, "Tracking ID"),
            (&self.delivery_date, "Delivery Date"),
            (&self.reason, "Shipment Reason"),
            (&self.cost, "Concession Cost"),
        ]
        .into_iter()
        .filter(|(column, _)| column.is_none())
        .map(|(_, name)| name)
        .collect()
    }
}

/// Header cells in column order, lower-cased.
fn ordered_headers(header: &TabularRow) -> Vec<(String, String)> {
    let mut cells: Vec<(String, String)> = header
        .cells
        .iter()
        .map(|(column, value)| (column.clone(), value.to_text().to_lowercase()))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    cells.sort_by_key(|(column, _)| column_index(column).unwrap_or(usize::MAX));
    cells
}

/// First column whose header contains a pattern; patterns are tried in
/// order, so an earlier pattern beats an earlier column.
fn find_column(headers: &[(String, String)], patterns: &[&str]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        headers
            .iter()
            .find(|(_, text)| text.contains(pattern))
            .map(|(column, _)| column.clone())
    })
}

/// Detects the concessions columns from the header row.
#[must_use]
pub fn detect_columns(header: &TabularRow) -> ConcessionColumns {
    let headers = ordered_headers(header);
    ConcessionColumns {
        week: find_column(&headers, WEEK_PATTERNS),
        transport_id: find_column(&headers, TRANSPORT_ID_PATTERNS),
        tracking_id: find_column(&headers, TRACKING_ID_PATTERNS),
        delivery_date: find_column(&headers, DELIVERY_DATE_PATTERNS),
        reason: find_column(&headers, REASON_PATTERNS),
        cost: find_column(&headers, COST_PATTERNS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_export_headers() {
        let header = TabularRow::new(0)
            .with_text("A", "Week")
            .with_text("B", "transporter_id")
            .with_text("C", "tracking_id")
            .with_text("D", "delivery_date_time")
            .with_text("E", "shipment_reason")
            .with_text("F", "Concession Cost");
        let columns = detect_columns(&header);
        assert_eq!(columns.week.as_deref(), Some("A"));
        assert_eq!(columns.transport_id.as_deref(), Some("B"));
        assert_eq!(columns.tracking_id.as_deref(), Some("C"));
        assert_eq!(columns.delivery_date.as_deref(), Some("D"));
        assert_eq!(columns.reason.as_deref(), Some("E"));
        assert_eq!(columns.cost.as_deref(), Some("F"));
        assert!(columns.missing().is_empty());
    }

    #[test]
    fn columns_are_scanned_in_sheet_order() {
        let header = TabularRow::new(0)
            .with_text("AA", "Cost")
            .with_text("B", "Kosten")
            .with_text("C", "Grund");
        let columns = detect_columns(&header);
        assert_eq!(columns.cost.as_deref(), Some("AA"));
        assert_eq!(columns.reason.as_deref(), Some("C"));
        assert_eq!(
            columns.missing(),
            vec!["Transport ID", "Tracking ID", "Delivery Date"]
        );
        assert_eq!(columns.week, None);
    }
}
