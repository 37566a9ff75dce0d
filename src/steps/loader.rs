use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::excel::{self, Sheet};
use crate::gradebook::EditedSheet;

/// Grade columns (after the name column) that get the decimal conversion.
const CONVERTED_GRADE_COLUMNS: usize = 8;
const MISSING_TEXT: &str = "nan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStats {
    pub converted: usize,
    pub total: usize,
}

/// Reloads the edited spreadsheet from disk.
pub fn load_edited(path: &Path) -> Result<EditedSheet> {
    println!("\n{}", "=".repeat(60));
    println!("LOADING EDITED SPREADSHEET");
    println!("{}", "=".repeat(60));

    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    println!("[INFO] Loading: {}", path.display());

    let sheet = excel::open_first_sheet(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let (edited, stats) = normalize_sheet(&sheet)?;

    info!(
        students = edited.student_count(),
        columns = edited.column_count(),
        "Spreadsheet loaded"
    );
    println!("[OK] Spreadsheet loaded.");
    println!(
        "[INFO] Data: {} students, {} columns",
        edited.student_count(),
        edited.column_count()
    );
    println!(
        "[INFO] Numbers converted: {}/{} cells",
        stats.converted, stats.total
    );

    Ok(edited)
}

/// Promotes row 0 to headers and normalizes the body.
///
/// Floats in the first grade columns become comma-decimal text; empty cells
/// and the literal `nan` become missing.
pub fn normalize_sheet(sheet: &Sheet) -> Result<(EditedSheet, LoadStats)> {
    let Some((header_row, body)) = sheet.data.split_first() else {
        anyhow::bail!("The spreadsheet is empty");
    };

    let headers: Vec<String> = header_row.iter().map(|cell| cell.value.clone()).collect();
    let mut stats = LoadStats::default();

    let rows: Vec<Vec<Option<String>>> = body
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let grade_col = (1..=CONVERTED_GRADE_COLUMNS).contains(&col);
                    if grade_col {
                        stats.total += 1;
                    }

                    if let (true, Some(f)) = (grade_col, cell.as_float()) {
                        stats.converted += 1;
                        return Some(excel::format_number(f, ','));
                    }

                    if cell.is_empty() || cell.value == MISSING_TEXT {
                        None
                    } else {
                        Some(cell.value.clone())
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    Ok((EditedSheet { headers, rows }, stats))
}
