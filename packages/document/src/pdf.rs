//! PDF page and positional item extraction.
//!
//! [`pdf_extract`] yields plain text per page, with table columns laid out
//! as runs of spaces. Positional items are recovered from that layout: each
//! line is split into cells on gaps of two or more spaces, `x` comes from
//! the character column and `y` steps down from the page height by a fixed
//! line pitch. The pitch is wider than the 20 unit row grouping threshold
//! used by the scorecard extractors, so they see the same rows the text
//! shows.
//!
//! A layout produced by an external text layer can be supplied instead via
//! [`load_positional_json`].

use std::sync::LazyLock;

use dsp_quality_models::{PdfPage, PositionalItem};
use regex::Regex;

use crate::DocumentError;

/// Height of a US Letter page in points.
pub const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Vertical distance between synthesized text lines.
pub const LINE_PITCH: f64 = 24.0;

/// Horizontal width of one character column.
pub const CHAR_WIDTH: f64 = 5.0;

static CELL_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|\t").expect("valid regex"));

/// Extracts up to `max_pages` pages from PDF bytes.
///
/// # Errors
///
/// * [`DocumentError::Pdf`] if the PDF cannot be parsed
pub fn read_pages(bytes: &[u8], max_pages: usize) -> Result<Vec<PdfPage>, DocumentError> {
    let texts = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocumentError::Pdf(format!("failed to extract text from PDF: {e}")))?;

    if texts.len() > max_pages {
        log::debug!(
            "PDF has {} pages, only the first {max_pages} are loaded",
            texts.len()
        );
    }

    let pages: Vec<PdfPage> = texts
        .into_iter()
        .take(max_pages)
        .enumerate()
        .map(|(i, text)| page_from_text(u32::try_from(i + 1).unwrap_or(u32::MAX), &text))
        .collect();

    log::debug!("Extracted {} PDF pages", pages.len());

    Ok(pages)
}

/// Builds a page, including positional items, from laid-out page text.
#[must_use]
pub fn page_from_text(number: u32, text: &str) -> PdfPage {
    PdfPage {
        number,
        text: text.to_owned(),
        items: items_from_text(text),
    }
}

/// Synthesizes positional items from laid-out text.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn items_from_text(text: &str) -> Vec<PositionalItem> {
    let lines: Vec<&str> = text.lines().collect();
    let page_height = DEFAULT_PAGE_HEIGHT.max((lines.len() + 1) as f64 * LINE_PITCH);

    let mut items = Vec::new();
    for (line_no, line) in lines.iter().enumerate() {
        let y = page_height - (line_no + 1) as f64 * LINE_PITCH;
        let mut start = 0;
        let mut push_cell = |from: usize, to: usize| {
            let cell = &line[from..to];
            let trimmed = cell.trim();
            if !trimmed.is_empty() {
                let lead = cell.len() - cell.trim_start().len();
                let column = line[..from + lead].chars().count();
                items.push(PositionalItem::new(
                    trimmed,
                    column as f64 * CHAR_WIDTH,
                    y,
                    page_height,
                ));
            }
        };
        for gap in CELL_GAP_RE.find_iter(line) {
            push_cell(start, gap.start());
            start = gap.end();
        }
        push_cell(start, line.len());
    }

    items
}

/// Decodes a positional layout: a JSON array of pages, each an array of
/// items with `text`, `x`, `y` and `pageHeight`.
///
/// Page text is rebuilt from the items, top to bottom and left to right.
///
/// # Errors
///
/// * [`DocumentError::Json`] if the layout is malformed
pub fn load_positional_json(bytes: &[u8]) -> Result<Vec<PdfPage>, DocumentError> {
    let layout: Vec<Vec<PositionalItem>> = serde_json::from_slice(bytes)?;

    Ok(layout
        .into_iter()
        .enumerate()
        .map(|(i, items)| PdfPage {
            number: u32::try_from(i + 1).unwrap_or(u32::MAX),
            text: text_from_items(&items),
            items,
        })
        .collect())
}

fn text_from_items(items: &[PositionalItem]) -> String {
    let mut sorted: Vec<&PositionalItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<&str>> = Vec::new();
    let mut last_y: Option<f64> = None;
    for item in sorted {
        let same_line = last_y.is_some_and(|y| (y - item.y).abs() < f64::EPSILON);
        if let Some(line) = lines.last_mut().filter(|_| same_line) {
            line.push(&item.text);
        } else {
            lines.push(vec![&item.text]);
        }
        last_y = Some(item.y);
    }

    lines
        .iter()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_split_on_wide_gaps() {
        let text = "Transporter ID   Delivered   DCR\nA1B2C3D4E5F6G7   120   99.5 %";
        let items = items_from_text(text);
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].text, "Transporter ID");
        assert!(items[0].x.abs() < f64::EPSILON);
        assert_eq!(items[1].text, "Delivered");
        assert!((items[1].x - 17.0 * CHAR_WIDTH).abs() < f64::EPSILON);
        assert_eq!(items[5].text, "99.5 %");
    }

    #[test]
    fn later_lines_are_lower_on_the_page() {
        let items = items_from_text("top\n\nbottom");
        assert_eq!(items.len(), 2);
        assert!(items[0].y > items[1].y);
        assert!((items[0].y - items[1].y - 2.0 * LINE_PITCH).abs() < f64::EPSILON);
        assert!((items[0].page_height - DEFAULT_PAGE_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn positional_json_rebuilds_text() {
        let json = br#"[[
            {"text": "Score", "x": 10, "y": 700, "pageHeight": 800},
            {"text": "Overall", "x": 0, "y": 700, "pageHeight": 800},
            {"text": "87%", "x": 0, "y": 680, "pageHeight": 800}
        ]]"#;
        let pages = load_positional_json(json).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].text, "Overall Score\n87%");
    }

    #[test]
    fn invalid_pdf_is_an_error() {
        assert!(matches!(
            read_pages(b"not a pdf", 5),
            Err(DocumentError::Pdf(_))
        ));
    }
}
