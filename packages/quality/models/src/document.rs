//! Raw document and loaded-document types.
//!
//! A [`RawDocument`] is the immutable upload. The loader turns it into one
//! of three shapes: plain text (HTML), positional pages (PDF), or tabular
//! rows keyed by column letter (Excel, CSV).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Declared type of an uploaded file.
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
pub enum DocumentKind {
    /// PDF report (scorecards).
    Pdf,
    /// Excel workbook (mentor exports, concessions).
    Excel,
    /// Comma separated values.
    Csv,
    /// HTML report (customer contact compliance).
    Html,
}

impl DocumentKind {
    /// Detects the document kind from a file name's extension.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown or missing
    /// extensions.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" | "xls" | "xlsm" => Some(Self::Excel),
            "csv" => Some(Self::Csv),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// An uploaded file: bytes plus the declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Original file name, used for report-period detection.
    pub file_name: String,
    /// Declared kind.
    pub kind: DocumentKind,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl RawDocument {
    /// Creates a new raw document.
    #[must_use]
    pub fn new(file_name: impl Into<String>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            bytes,
        }
    }
}

/// One fragment of PDF text with its position on the page.
///
/// Larger `y` means closer to the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionalItem {
    /// Text content of the fragment.
    pub text: String,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, measured upward from the bottom of the page.
    pub y: f64,
    /// Height of the page the fragment belongs to.
    pub page_height: f64,
}

impl PositionalItem {
    /// Creates a new positional item.
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, page_height: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            page_height,
        }
    }
}

/// A single page of a PDF document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPage {
    /// 1-based page number.
    pub number: u32,
    /// Concatenated text of the page.
    pub text: String,
    /// Positional fragments, in no particular order.
    pub items: Vec<PositionalItem>,
}

/// Value of a single spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Textual content.
    Text(String),
    /// Numeric content.
    Number(f64),
    /// No content.
    #[default]
    Empty,
}

impl CellValue {
    /// Returns `true` if the cell is empty or contains only whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
            Self::Empty => true,
        }
    }

    /// Returns the text content if this is a text cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content if this is a number cell.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the cell as trimmed text.
    ///
    /// Whole numbers render without a fractional part.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_owned(),
            Self::Number(n) => format_number(*n),
            Self::Empty => String::new(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One spreadsheet row keyed by column letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularRow {
    /// 0-based position of the row in the sheet.
    pub index: usize,
    /// Cell values keyed by column letter (`"A"`, `"B"`, ... `"AA"`).
    pub cells: BTreeMap<String, CellValue>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl TabularRow {
    /// Creates an empty row at the given position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
        }
    }

    /// Builder-style helper that sets a text cell.
    #[must_use]
    pub fn with_text(mut self, column: &str, value: &str) -> Self {
        self.cells
            .insert(column.to_owned(), CellValue::Text(value.to_owned()));
        self
    }

    /// Builder-style helper that sets a numeric cell.
    #[must_use]
    pub fn with_number(mut self, column: &str, value: f64) -> Self {
        self.cells
            .insert(column.to_owned(), CellValue::Number(value));
        self
    }

    /// Returns the cell at `column`, or an empty cell.
    #[must_use]
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// Returns the trimmed text of the cell at `column`.
    #[must_use]
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_text()
    }

    /// Returns `true` if every cell is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_file_name("Scorecard_Week12.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_file_name("mentor.xlsx"),
            Some(DocumentKind::Excel)
        );
        assert_eq!(
            DocumentKind::from_file_name("contacts.htm"),
            Some(DocumentKind::Html)
        );
        assert_eq!(DocumentKind::from_file_name("notes.txt"), None);
        assert_eq!(DocumentKind::from_file_name("no_extension"), None);
    }

    #[test]
    fn cell_text_formats_whole_numbers() {
        assert_eq!(CellValue::Number(42.0).to_text(), "42");
        assert_eq!(CellValue::Number(4.5).to_text(), "4.5");
        assert_eq!(CellValue::Text("  x ".to_owned()).to_text(), "x");
        assert!(CellValue::Text("   ".to_owned()).is_empty());
    }

    #[test]
    fn missing_cells_read_as_empty() {
        let row = TabularRow::new(0).with_text("A", "Driver#");
        assert_eq!(row.text("A"), "Driver#");
        assert!(row.get("Z").is_empty());
    }

    #[test]
    fn positional_item_uses_camel_case_json() {
        let item = PositionalItem::new("DCR", 10.0, 700.0, 792.0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pageHeight"], 792.0);
    }
}
