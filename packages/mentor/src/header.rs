//! Header row detection.
//!
//! Mentor exports come with English headers, German headers, or no header
//! at all, and the header is not always the first row. A row counts as the
//! header when any fingerprint matches: a fixed column whose text contains
//! one of the known labels of that position in the vendor template.

use dsp_quality_models::TabularRow;

/// Number of leading rows searched for a header.
pub const HEADER_SCAN_ROWS: usize = 10;

/// A column position together with the labels seen there in header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    /// Column letter.
    pub column: &'static str,
    /// Case-sensitive substrings, any of which identifies a header.
    pub labels: &'static [&'static str],
}

/// Known header fingerprints of the vendor template (English and German).
pub const FINGERPRINTS: &[Fingerprint] = &[
    Fingerprint {
        column: "A",
        labels: &["First Name", "Driver", "#"],
    },
    Fingerprint {
        column: "B",
        labels: &["Last Name"],
    },
    Fingerprint {
        column: "D",
        labels: &["Station"],
    },
    Fingerprint {
        column: "I",
        labels: &["Beschl", "Accel"],
    },
    Fingerprint {
        column: "K",
        labels: &["Fahrten"],
    },
    Fingerprint {
        column: "L",
        labels: &["Km"],
    },
    Fingerprint {
        column: "M",
        labels: &["Stunden"],
    },
    Fingerprint {
        column: "N",
        labels: &["Beschl"],
    },
    Fingerprint {
        column: "O",
        labels: &["Bremsen"],
    },
    Fingerprint {
        column: "P",
        labels: &["Kurven"],
    },
    Fingerprint {
        column: "V",
        labels: &["Tempo"],
    },
];

impl Fingerprint {
    /// Returns `true` if `row` has a text cell in this column containing
    /// one of the labels.
    #[must_use]
    pub fn matches(&self, row: &TabularRow) -> bool {
        row.get(self.column)
            .as_str()
            .is_some_and(|text| self.labels.iter().any(|label| text.contains(label)))
    }
}

/// Finds the header row among the first [`HEADER_SCAN_ROWS`] rows.
///
/// Returns the earliest row matching any fingerprint, or `None` when the
/// export has no recognizable header.
#[must_use]
pub fn locate_header(rows: &[TabularRow]) -> Option<&TabularRow> {
    let header = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .find(|row| FINGERPRINTS.iter().any(|fp| fp.matches(row)));

    match header {
        Some(row) => log::debug!("Found mentor header at row {}", row.index),
        None => log::warn!(
            "No mentor header in the first {HEADER_SCAN_ROWS} rows, using fixed column positions"
        ),
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_row(index: usize) -> TabularRow {
        TabularRow::new(index)
            .with_text("A", "A1B2C3D4E5F6G7")
            .with_text("D", "DSU1")
            .with_number("E", 120.0)
    }

    #[test]
    fn finds_english_header_after_title_rows() {
        let rows = vec![
            TabularRow::new(0).with_text("A", "Weekly Mentor Report"),
            TabularRow::new(1),
            TabularRow::new(2)
                .with_text("A", "Driver#")
                .with_text("D", "Station"),
            data_row(3),
        ];
        let header = locate_header(&rows).unwrap();
        assert_eq!(header.index, 2);
    }

    #[test]
    fn finds_german_header_by_tempo_column() {
        let rows = vec![
            TabularRow::new(0).with_text("V", "Tempo"),
            data_row(1),
        ];
        assert_eq!(locate_header(&rows).unwrap().index, 0);
    }

    #[test]
    fn earliest_matching_row_wins() {
        let rows = vec![
            data_row(0),
            TabularRow::new(1).with_text("D", "Station"),
            TabularRow::new(2).with_text("A", "First Name"),
        ];
        assert_eq!(locate_header(&rows).unwrap().index, 1);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let rows = vec![TabularRow::new(0).with_text("D", "station")];
        assert!(locate_header(&rows).is_none());
    }

    #[test]
    fn only_first_ten_rows_are_scanned() {
        let mut rows: Vec<TabularRow> = (0..HEADER_SCAN_ROWS).map(data_row).collect();
        rows.push(TabularRow::new(HEADER_SCAN_ROWS).with_text("D", "Station"));
        assert!(locate_header(&rows).is_none());
    }

    #[test]
    fn numeric_cells_never_match() {
        let rows = vec![TabularRow::new(0).with_number("A", 1.0)];
        assert!(locate_header(&rows).is_none());
    }
}
