#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document loading for weekly quality reports.
//!
//! Turns the bytes of an uploaded file into the shape the extractors work
//! on:
//! - **PDF**: per-page text plus positional text fragments ([`pdf`])
//! - **Excel / CSV**: rows keyed by column letter ([`tabular`])
//! - **HTML**: decoded text, parsed later by the contact crate
//!
//! An empty or unreadable file is the only unrecoverable failure; every
//! later stage degrades to `None` or a default instead of failing.

pub mod pdf;
pub mod period;
pub mod tabular;

use dsp_quality_models::{DocumentKind, PdfPage, RawDocument, TabularRow};

/// Errors that make a document unusable.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The uploaded buffer contained no bytes.
    #[error("Document '{0}' is empty")]
    Empty(String),

    /// The file extension does not map to a supported kind.
    #[error("Unsupported document type: {0}")]
    UnsupportedKind(String),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// The workbook could not be opened or read.
    #[error("Excel error: {0}")]
    Excel(String),

    /// The workbook contains no worksheet.
    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A positional layout could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum number of PDF pages to load.
    pub max_pdf_pages: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { max_pdf_pages: 5 }
    }
}

/// A document after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedDocument {
    /// Decoded text (HTML).
    Text(String),
    /// PDF pages with positional items.
    Pages(Vec<PdfPage>),
    /// Spreadsheet rows, top to bottom.
    Rows(Vec<TabularRow>),
}

impl LoadedDocument {
    /// Returns the decoded text, if this is a text document.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the PDF pages, if this is a PDF document.
    #[must_use]
    pub fn pages(&self) -> Option<&[PdfPage]> {
        match self {
            Self::Pages(pages) => Some(pages),
            _ => None,
        }
    }

    /// Returns the rows, if this is a tabular document.
    #[must_use]
    pub fn rows(&self) -> Option<&[TabularRow]> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Loads a raw document.
///
/// # Errors
///
/// * [`DocumentError::Empty`] if the buffer has no bytes
/// * a backend error if the bytes cannot be decoded as the declared kind
pub fn load(raw: &RawDocument, options: LoadOptions) -> Result<LoadedDocument, DocumentError> {
    if raw.bytes.is_empty() {
        return Err(DocumentError::Empty(raw.file_name.clone()));
    }

    log::debug!(
        "Loading {} ({} bytes) as {}",
        raw.file_name,
        raw.bytes.len(),
        raw.kind
    );

    match raw.kind {
        DocumentKind::Html => Ok(LoadedDocument::Text(
            String::from_utf8_lossy(&raw.bytes).into_owned(),
        )),
        DocumentKind::Csv => tabular::read_csv(&raw.bytes).map(LoadedDocument::Rows),
        DocumentKind::Excel => tabular::read_excel(&raw.bytes).map(LoadedDocument::Rows),
        DocumentKind::Pdf => pdf::read_pages(&raw.bytes, options.max_pdf_pages)
            .map(LoadedDocument::Pages),
    }
}

/// Reads a file from disk and detects its kind from the extension.
///
/// # Errors
///
/// * [`DocumentError::UnsupportedKind`] for an unknown extension
/// * [`DocumentError::Io`] if the file cannot be read
pub fn read_file(path: &std::path::Path) -> Result<RawDocument, DocumentError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = DocumentKind::from_file_name(&file_name)
        .ok_or_else(|| DocumentError::UnsupportedKind(file_name.clone()))?;
    let bytes = std::fs::read(path)?;

    Ok(RawDocument::new(file_name, kind, bytes))
}

/// Converts a 0-based column index into a spreadsheet column letter.
///
/// `0 → "A"`, `25 → "Z"`, `26 → "AA"`.
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts a spreadsheet column letter into a 0-based column index.
///
/// Returns `None` for anything other than ASCII letters, and for letter
/// strings too long to fit a `usize`.
#[must_use]
pub fn column_index(letter: &str) -> Option<usize> {
    if letter.is_empty() {
        return None;
    }
    letter
        .chars()
        .try_fold(0usize, |acc, c| {
            let c = c.to_ascii_uppercase();
            if !c.is_ascii_uppercase() {
                return None;
            }
            acc.checked_mul(26)?
                .checked_add(c as usize - 'A' as usize + 1)
        })
        .map(|n| n - 1)
}
