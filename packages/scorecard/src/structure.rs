//! Driver table extraction from positional PDF items.
//!
//! Items are grouped into rows by vertical proximity, the table header is
//! located by its column labels, and each data row becomes a
//! [`DriverKpi`]. Without a header, rows starting with a transporter ID are
//! read positionally.

use std::sync::LazyLock;

use dsp_quality_models::{
    DriverIdentity, DriverKpi, DriverMetric, KpiStatus, PositionalItem, deduplicate_drivers,
};
use regex::Regex;

use crate::company::determine_status;

/// Vertical distance below which an item joins the row of the item above it.
pub const ROW_THRESHOLD: f64 = 20.0;

/// Header labels of the driver table.
pub const EXPECTED_HEADERS: [&str; 4] = ["Transporter ID", "Delivered", "DCR", "DNR DPMO"];

static STRICT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^A[A-Z0-9]{13}$").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

/// Driver table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverColumn {
    /// Anonymised transporter ID of the driver.
    TransporterId,
    /// Packages delivered.
    Delivered,
    /// Delivery completion rate.
    Dcr,
    /// Delivered-not-received defects per million.
    DnrDpmo,
    /// Photo-on-delivery acceptance.
    Pod,
    /// Contact compliance.
    Cc,
    /// Customer escalations.
    Ce,
    /// Delivery experience score.
    Dex,
}

/// Metric columns in table order.
pub const METRIC_COLUMNS: [DriverColumn; 7] = [
    DriverColumn::Delivered,
    DriverColumn::Dcr,
    DriverColumn::DnrDpmo,
    DriverColumn::Pod,
    DriverColumn::Cc,
    DriverColumn::Ce,
    DriverColumn::Dex,
];

impl DriverColumn {
    /// Column for a header cell.
    #[must_use]
    pub fn from_header(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.contains("transporter") || lower == "id" {
            Some(Self::TransporterId)
        } else if lower == "delivered" {
            Some(Self::Delivered)
        } else if lower == "dcr" {
            Some(Self::Dcr)
        } else if lower.contains("dpmo") || lower == "dnr" {
            Some(Self::DnrDpmo)
        } else if lower == "pod" {
            Some(Self::Pod)
        } else if lower == "cc" {
            Some(Self::Cc)
        } else if lower == "ce" {
            Some(Self::Ce)
        } else if lower == "dex" {
            Some(Self::Dex)
        } else {
            None
        }
    }

    /// Builds the metric for a value of this column.
    #[must_use]
    pub fn metric(self, value: f64) -> Option<DriverMetric> {
        let (name, target, unit, status) = match self {
            Self::TransporterId => return None,
            Self::Delivered => ("Delivered", 0.0, "", determine_status("Delivered", value)),
            Self::Dcr => ("DCR", 98.5, "%", determine_status("DCR", value)),
            Self::DnrDpmo => ("DNR DPMO", 1500.0, "DPMO", determine_status("DNR DPMO", value)),
            Self::Pod => ("POD", 98.0, "%", determine_status("POD", value)),
            Self::Cc => ("CC", 95.0, "%", determine_status("Contact Compliance", value)),
            Self::Ce => (
                "CE",
                0.0,
                "",
                if value.abs() < f64::EPSILON {
                    KpiStatus::Fantastic
                } else {
                    KpiStatus::Poor
                },
            ),
            Self::Dex => ("DEX", 95.0, "%", determine_status("DEX", value)),
        };
        Some(DriverMetric {
            name: name.to_owned(),
            value,
            target,
            unit: unit.to_owned(),
            status,
        })
    }
}

/// Groups items into rows, top of the page first, each row left to right.
///
/// Items are walked top to bottom and each one is compared with the item
/// directly above it, so a row whose cells are slightly staggered stays
/// together.
#[must_use]
pub fn group_rows(items: &[PositionalItem], threshold: f64) -> Vec<Vec<PositionalItem>> {
    let mut sorted: Vec<&PositionalItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut rows: Vec<Vec<PositionalItem>> = Vec::new();
    let mut last_y = f64::NAN;
    for item in sorted {
        match rows.last_mut() {
            Some(row) if (last_y - item.y).abs() < threshold => row.push(item.clone()),
            _ => rows.push(vec![item.clone()]),
        }
        last_y = item.y;
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    rows
}

/// Parses a metric cell: `-` is zero, a lone comma is a decimal point, and
/// with both separators the comma groups thousands.
#[must_use]
pub fn parse_metric_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed == "-" || trimmed == "–" {
        return Some(0.0);
    }
    let normalized = if trimmed.contains(',') && trimmed.contains('.') {
        trimmed.replace(',', "")
    } else {
        trimmed.replace(',', ".")
    };
    NUMBER_RE
        .find(&normalized)
        .and_then(|m| m.as_str().parse().ok())
}

fn looks_like_driver_id(text: &str) -> bool {
    let text = text.trim();
    text.len() >= 6 && text.starts_with('A')
}

fn is_header_row(row: &[PositionalItem]) -> bool {
    let matches = EXPECTED_HEADERS
        .iter()
        .filter(|header| {
            let header = header.to_lowercase();
            row.iter().any(|item| {
                let cell = item.text.trim().to_lowercase();
                cell == header || cell.contains(&header)
            })
        })
        .count();
    matches >= 3
}

fn driver_from_header_row(
    row: &[PositionalItem],
    columns: &[(usize, DriverColumn)],
) -> Option<DriverKpi> {
    if row.len() < 4 {
        return None;
    }
    let id_index = columns
        .iter()
        .find(|(_, c)| *c == DriverColumn::TransporterId)
        .map(|(i, _)| *i)?;
    let id = row.get(id_index)?.text.trim();
    if !looks_like_driver_id(id) {
        return None;
    }

    let metrics = METRIC_COLUMNS
        .iter()
        .filter_map(|column| {
            let (index, _) = columns.iter().find(|(_, c)| c == column)?;
            let value = parse_metric_number(&row.get(*index)?.text)?;
            column.metric(value)
        })
        .collect();

    Some(DriverKpi {
        name: id.to_owned(),
        metrics,
    })
}

fn driver_from_positions(row: &[PositionalItem]) -> Option<DriverKpi> {
    let (first, rest) = row.split_first()?;
    let id = first.text.trim();
    if !looks_like_driver_id(id) {
        return None;
    }
    let values: Vec<f64> = rest
        .iter()
        .filter_map(|item| parse_metric_number(&item.text))
        .collect();
    if values.len() < 3 {
        return None;
    }

    Some(DriverKpi {
        name: id.to_owned(),
        metrics: METRIC_COLUMNS
            .iter()
            .zip(values)
            .filter_map(|(column, value)| column.metric(value))
            .collect(),
    })
}

/// Extracts driver KPI rows from the items of one page.
#[must_use]
pub fn extract_driver_kpis(items: &[PositionalItem]) -> Vec<DriverKpi> {
    let rows = group_rows(items, ROW_THRESHOLD);

    let header = rows.iter().position(|row| is_header_row(row));
    let drivers: Vec<DriverKpi> = if let Some(header_index) = header {
        let columns: Vec<(usize, DriverColumn)> = rows[header_index]
            .iter()
            .enumerate()
            .filter_map(|(i, item)| DriverColumn::from_header(&item.text).map(|c| (i, c)))
            .collect();
        log::debug!(
            "Driver table header at row {header_index} with {} known columns",
            columns.len()
        );
        rows[header_index + 1..]
            .iter()
            .filter_map(|row| driver_from_header_row(row, &columns))
            .collect()
    } else {
        log::debug!("No driver table header, reading rows by position");
        rows.iter().filter_map(|row| driver_from_positions(row)).collect()
    };

    deduplicate_drivers(drivers)
}

/// Checks whether an extracted driver list looks like a real driver table.
///
/// At least five names must start with `A`, and at least one name must
/// either match the strict transporter-ID format or start with `A`. The
/// result is advisory; nothing is discarded here.
#[must_use]
pub fn validate_driver_extraction<T: DriverIdentity>(drivers: &[T]) -> bool {
    let a_prefixed = drivers
        .iter()
        .filter(|d| d.driver_name().starts_with('A'))
        .count();
    let strict = drivers
        .iter()
        .any(|d| STRICT_ID_RE.is_match(d.driver_name()));

    let plausible = a_prefixed >= 5 && (strict || a_prefixed > 0);
    if !plausible {
        log::warn!(
            "Driver extraction looks unreliable: {} drivers, {a_prefixed} with an A prefix",
            drivers.len()
        );
    }
    plausible
}
