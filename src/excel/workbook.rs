use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::{Path, PathBuf};

use crate::excel::{Cell, CellKind, Sheet};

const NAME_COLUMN_WIDTH: f64 = 40.0;
const GRADE_COLUMN_WIDTH: f64 = 22.0;

/// Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` file, header row
/// included.
pub fn open_first_sheet<P: AsRef<Path>>(path: P) -> Result<Sheet> {
    let path_ref = path.as_ref();

    let mut workbook = open_workbook_auto(path_ref)
        .with_context(|| format!("Unable to parse Excel file: {}", path_ref.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(name) = sheet_names.first() else {
        anyhow::bail!("No worksheets found in file");
    };

    let range = workbook
        .worksheet_range(name)
        .with_context(|| format!("Unable to read worksheet: {}", name))?;

    Ok(create_sheet_from_range(name, range))
}

fn create_sheet_from_range(name: &str, range: calamine::Range<Data>) -> Sheet {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let (height, width) = range.get_size();
    let rows = if height == 0 { 0 } else { start_row + height };
    let cols = if width == 0 { 0 } else { start_col + width };

    let mut data = vec![vec![Cell::empty(); cols]; rows];

    for (row_idx, col_idx, cell) in range.used_cells() {
        let converted = match cell {
            Data::Empty => Cell::empty(),
            Data::String(s) => Cell::new(s.clone(), CellKind::Text),
            Data::Float(f) => Cell::new(format_number(*f, '.'), CellKind::Float(*f)),
            Data::Int(i) => Cell::new(i.to_string(), CellKind::Int(*i)),
            Data::Bool(b) => Cell::new(if *b { "TRUE" } else { "FALSE" }, CellKind::Bool),
            Data::DateTime(dt) => Cell::new(dt.as_f64().to_string(), CellKind::Date),
            Data::DateTimeIso(s) => Cell::new(s.clone(), CellKind::Date),
            Data::DurationIso(s) => Cell::new(s.clone(), CellKind::Text),
            Data::Error(e) => Cell::new(format!("Error: {:?}", e), CellKind::Error),
        };

        data[start_row + row_idx][start_col + col_idx] = converted;
    }

    Sheet {
        name: name.to_string(),
        data,
        max_rows: rows,
        max_cols: cols,
    }
}

/// Formats a float for display; integral values lose the fraction.
#[must_use]
pub fn format_number(f: f64, decimal_separator: char) -> String {
    let text = if f == (f as i64) as f64 && f.abs() < 1e10 {
        (f as i64).to_string()
    } else {
        f.to_string()
    };

    if decimal_separator == '.' {
        text
    } else {
        text.replace('.', &decimal_separator.to_string())
    }
}

/// Writes a single-sheet workbook: a bold header row followed by `rows`.
///
/// Every value is written as text so the portal's display strings survive
/// unchanged. Empty values leave the cell blank.
pub fn write_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(sheet_name)?;

    for col in 0..headers.len() {
        let width = if col == 0 {
            NAME_COLUMN_WIDTH
        } else {
            GRADE_COLUMN_WIDTH
        };
        worksheet.set_column_width(col as u16, width)?;
    }

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (row, values) in rows.iter().enumerate() {
        let row_idx = (row + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            // Skip empty cells
            if value.is_empty() {
                continue;
            }
            worksheet.write_string(row_idx, col as u16, value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Unable to write Excel file: {}", path.display()))?;

    Ok(())
}

/// Moves an existing file aside as `<stem>_<timestamp>.<ext>`.
///
/// Returns the new path, or `None` when there was nothing to move.
pub fn backup_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let file_stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("sheet");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("xlsx");
    let parent_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let backup = parent_dir.join(format!("{}_{}.{}", file_stem, timestamp, extension));

    std::fs::rename(path, &backup)
        .with_context(|| format!("Unable to back up {}", path.display()))?;

    Ok(Some(backup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_drop_the_fraction() {
        assert_eq!(format_number(8.0, ','), "8");
        assert_eq!(format_number(-3.0, '.'), "-3");
    }

    #[test]
    fn fractional_floats_use_the_separator() {
        assert_eq!(format_number(7.5, ','), "7,5");
        assert_eq!(format_number(7.5, '.'), "7.5");
        assert_eq!(format_number(9.25, ','), "9,25");
    }

    #[test]
    fn write_then_read_keeps_text_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.xlsx");
        let headers = vec!["Aluno".to_string(), "NOTA".to_string()];
        let rows = vec![
            vec!["Ana".to_string(), "7,5".to_string()],
            vec!["Bruno".to_string(), String::new()],
        ];

        write_sheet(&path, "Notas", &headers, &rows).unwrap();
        let sheet = open_first_sheet(&path).unwrap();

        assert_eq!(sheet.name, "Notas");
        assert_eq!(sheet.max_rows, 3);
        assert_eq!(sheet.cell(0, 1).unwrap().value, "NOTA");
        assert_eq!(sheet.cell(1, 1).unwrap().value, "7,5");
        assert!(sheet.cell(2, 1).unwrap().is_empty());
    }

    #[test]
    fn backup_moves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turma.xlsx");
        assert!(backup_existing(&path).unwrap().is_none());

        std::fs::write(&path, b"old").unwrap();
        let moved = backup_existing(&path).unwrap().unwrap();
        assert!(!path.exists());
        assert!(moved.exists());
        let name = moved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("turma_") && name.ends_with(".xlsx"), "{name}");
    }
}
