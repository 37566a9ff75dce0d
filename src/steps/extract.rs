use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{PortalConfig, COLUMN_LABELS};
use crate::excel;
use crate::gradebook::{GradeCell, Gradebook, StudentRow};
use crate::portal::{Page, RawRow};

const EXPORT_SHEET_NAME: &str = "Notas";

/// Scrapes the grade table of the current filter selection.
pub fn extract_gradebook(page: &dyn Page, portal: &PortalConfig) -> Result<Gradebook> {
    println!("\n{}", "=".repeat(60));
    println!("EXTRACTING TABLE DATA");
    println!("{}", "=".repeat(60));

    page.wait_for(&portal.grade_table, portal.table_timeout)?;
    let rows = page.table_rows(&portal.grade_table)?;
    println!("[INFO] Processing {} table rows...", rows.len());

    build_gradebook(&rows)
}

/// Turns scraped rows into a gradebook.
///
/// Rows without `td` cells (headers) are skipped. The name is the first line
/// of the first cell; every later cell holding an input contributes one grade.
pub fn build_gradebook(rows: &[RawRow]) -> Result<Gradebook> {
    let mut students = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let Some((first, rest)) = row.cells.split_first() else {
            continue;
        };

        let name = first.text.trim().lines().next().unwrap_or("").trim().to_string();
        let cells: Vec<GradeCell> = rest
            .iter()
            .filter_map(|cell| cell.input.as_ref())
            .map(|input| GradeCell::new(input.value.clone(), input.name.clone()))
            .collect();

        if i % 5 == 0 {
            debug!("processing row {}", i + 1);
        }
        students.push(StudentRow { name, cells });
    }

    let Some(widest) = students.iter().map(|s| s.cells.len() + 1).max() else {
        anyhow::bail!("The grade table has no student rows");
    };
    if widest > COLUMN_LABELS.len() {
        anyhow::bail!(
            "The grade table has {} grade columns; at most {} are known",
            widest - 1,
            COLUMN_LABELS.len() - 1
        );
    }

    Ok(Gradebook {
        columns: COLUMN_LABELS[..widest].iter().map(|s| s.to_string()).collect(),
        rows: students,
    })
}

/// Writes the displayed grades to `dir/file_name` and reports what was saved.
///
/// An existing file of the same name is moved aside first.
pub fn export_gradebook(gradebook: &Gradebook, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);

    if let Some(backup) = excel::backup_existing(&path)? {
        println!("[INFO] Previous export kept as {}", backup.display());
    }

    excel::write_sheet(
        &path,
        EXPORT_SHEET_NAME,
        &gradebook.columns,
        &gradebook.display_rows(),
    )
    .with_context(|| format!("Failed to export gradebook to {}", path.display()))?;

    info!(path = %path.display(), "Gradebook exported");
    println!("\n[OK] Data extracted successfully!");
    println!("[INFO] File created: {}", file_name);
    println!("[INFO] Location: {}", path.display());
    println!("[INFO] Students: {}", gradebook.student_count());
    println!("[INFO] Grade columns: {}", gradebook.grade_column_count());

    Ok(path)
}
