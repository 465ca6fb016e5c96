//! Spreadsheet readers.
//!
//! Both readers produce [`TabularRow`]s keyed by column letter so that the
//! header locator and column mapper can address cells the same way for
//! Excel and CSV sources.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use dsp_quality_models::{CellValue, TabularRow};

use crate::{DocumentError, column_letter};

/// Reads CSV bytes into rows.
///
/// No header row is assumed and records may have differing lengths. Every
/// cell is kept as text.
///
/// # Errors
///
/// * [`DocumentError::Csv`] if a record cannot be parsed
pub fn read_csv(bytes: &[u8]) -> Result<Vec<TabularRow>, DocumentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = TabularRow::new(index);
        for (col, value) in record.iter().enumerate() {
            let value = value.trim();
            let cell = if value.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(value.to_owned())
            };
            row.cells.insert(column_letter(col), cell);
        }
        rows.push(row);
    }

    log::debug!("Read {} CSV rows", rows.len());

    Ok(rows)
}

/// Reads the first worksheet of an Excel workbook into rows.
///
/// Row indexes and column letters are absolute sheet positions, so a sheet
/// whose used range starts below `A1` still addresses cells correctly.
///
/// # Errors
///
/// * [`DocumentError::Excel`] if the workbook cannot be opened or read
/// * [`DocumentError::NoWorksheet`] if the workbook has no sheets
pub fn read_excel(bytes: &[u8]) -> Result<Vec<TabularRow>, DocumentError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DocumentError::Excel(format!("failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DocumentError::NoWorksheet)?
        .map_err(|e| DocumentError::Excel(format!("failed to read worksheet: {e}")))?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let rows: Vec<TabularRow> = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| {
            let mut row = TabularRow::new(start_row as usize + offset);
            for (col, cell) in cells.iter().enumerate() {
                let value = cell_value(cell);
                if !value.is_empty() {
                    row.cells
                        .insert(column_letter(start_col as usize + col), value);
                }
            }
            row
        })
        .collect();

    log::debug!("Read {} worksheet rows", rows.len());

    Ok(rows)
}

#[allow(clippy::cast_precision_loss)]
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.trim().to_owned())
        }
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() || dt.as_f64() < 1.0 => {
            CellValue::Text(clock_time(dt.as_f64()))
        }
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
    }
}

/// Formats a day fraction (an Excel time or duration) as `HH:MM`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clock_time(days: f64) -> String {
    let minutes = (days.max(0.0) * 24.0 * 60.0).round() as u64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_keyed_by_letter() {
        let rows = read_csv(b"a,b,,d\n1,2\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("D"), "d");
        assert!(rows[0].get("C").is_empty());
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].text("B"), "2");
    }

    #[test]
    fn excel_cells_convert() {
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            cell_value(&Data::String(" Station ".to_owned())),
            CellValue::Text("Station".to_owned())
        );
        assert_eq!(cell_value(&Data::String("  ".to_owned())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn time_cells_become_clock_text() {
        assert_eq!(clock_time(0.354_166_666), "08:30");
        assert_eq!(clock_time(1.25), "30:00");
    }

    #[test]
    fn reads_first_worksheet_of_a_workbook() {
        let rows = read_excel(include_bytes!("../fixtures/mentor_week10.xlsx")).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].text("A"), "Driver First Name");
        assert_eq!(rows[2].get("E"), &CellValue::Number(87.0));
        assert_eq!(rows[2].get("F"), &CellValue::Number(1234.5));
        assert_eq!(rows[2].text("G"), "08:30");
        assert!(rows[2].get("I").is_empty());
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        assert!(matches!(
            read_excel(b"definitely not a workbook"),
            Err(DocumentError::Excel(_))
        ));
    }
}
