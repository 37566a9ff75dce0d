use anyhow::Result;
use tracing::{debug, warn};

use crate::config::PortalConfig;
use crate::gradebook::{EditedSheet, GradeEntry, Gradebook};
use crate::portal::{Locator, Page, PageError};

/// Tally of a write-back pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteReport {
    /// Grades typed (or assigned) into text inputs.
    pub filled: usize,
    /// Not-counted/absent checkboxes confirmed as selected.
    pub checked: usize,
    /// Fields that could not be written.
    pub errors: usize,
    /// Portal-computed fields left alone.
    pub skipped: usize,
}

impl WriteReport {
    pub fn processed(&self) -> usize {
        self.filled + self.checked + self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Writes every edited grade back into the portal.
///
/// The sheet must still list the gradebook's students in order. After that,
/// failures are per field: they are counted and the pass continues.
pub fn write_back(
    page: &dyn Page,
    gradebook: &Gradebook,
    edited: &EditedSheet,
    portal: &PortalConfig,
) -> Result<WriteReport> {
    println!("\n{}", "=".repeat(60));
    println!("AUTOMATIC GRADE FILLING");
    println!("{}", "=".repeat(60));

    edited.align(gradebook)?;

    let students = gradebook.student_count();
    let estimated: usize = gradebook.rows.iter().map(|r| r.cells.len()).sum();
    println!("[INFO] Processing {} students...", students);
    println!("[INFO] Estimated fields: {}", estimated);

    let mut report = WriteReport::default();

    for (i, student) in gradebook.rows.iter().enumerate() {
        println!("\n[ALUNO] {}", student.name);

        for (j, cell) in student.cells.iter().enumerate() {
            if portal.is_manual_average(&cell.field_id) {
                report.skipped += 1;
                continue;
            }

            let Some(value) = edited.grade(i, j) else {
                report.errors += 1;
                println!("   [ERRO] Field {}: column missing from the spreadsheet", j + 1);
                continue;
            };

            let entry = GradeEntry::classify(value, &portal.not_counted_marker);
            let written = match &entry {
                GradeEntry::Absent | GradeEntry::NotCounted => {
                    mark_checkbox(page, portal, &cell.field_id)
                }
                GradeEntry::Value(grade) => {
                    if !looks_like_grade(grade) {
                        warn!(field = %cell.field_id, "unusual grade {grade:?} written as is");
                    }
                    fill_grade(page, portal, &cell.field_id, grade)
                }
            };

            match (written, &entry) {
                (Ok(()), GradeEntry::Absent) => {
                    report.checked += 1;
                    println!("   [VAZIO] Absent, N/C marked");
                }
                (Ok(()), GradeEntry::NotCounted) => {
                    report.checked += 1;
                    println!("   [NC] N/C marked");
                }
                (Ok(()), GradeEntry::Value(grade)) => {
                    report.filled += 1;
                    println!("   [NOTA] {}", grade);
                }
                (Err(e), _) => {
                    report.errors += 1;
                    println!("   [ERRO] Field {}: {}", j + 1, e);
                }
            }
        }

        let progress = (i + 1) as f64 / students as f64 * 100.0;
        println!("   [PROG] Progress: {:.1}%", progress);
    }

    print_report(&report);
    Ok(report)
}

/// Types `grade` into the input with id `field_id`, falling back to a direct
/// value assignment when the input refuses keystrokes.
fn fill_grade(
    page: &dyn Page,
    portal: &PortalConfig,
    field_id: &str,
    grade: &str,
) -> Result<(), PageError> {
    let locator = Locator::id(field_id);
    page.wait_for(&locator, portal.field_timeout)?;

    if !page.field_state(&locator)?.is_interactable() {
        return Err(PageError::NotInteractable(locator));
    }

    match page.type_text(&locator, grade) {
        Err(PageError::NotWritable(_)) => {
            debug!("{field_id} refused typing, assigning value directly");
            page.assign_value(&locator, grade)
        }
        other => other,
    }
}

/// Selects the not-counted checkbox paired with `field_id`, unless it
/// already is.
fn mark_checkbox(page: &dyn Page, portal: &PortalConfig, field_id: &str) -> Result<(), PageError> {
    let locator = Locator::id(&portal.checkbox_id(field_id));
    page.wait_for(&locator, portal.field_timeout)?;

    let state = page.field_state(&locator)?;
    if !state.is_interactable() {
        return Err(PageError::NotInteractable(locator));
    }
    if !state.checked {
        page.click(&locator)?;
    }
    Ok(())
}

/// A comma-decimal number such as `7` or `7,5`.
fn looks_like_grade(grade: &str) -> bool {
    !grade.contains('.') && grade.replace(',', ".").parse::<f64>().is_ok()
}

fn print_report(report: &WriteReport) {
    println!("\n{}", "=".repeat(60));
    println!("FINAL REPORT");
    println!("{}", "=".repeat(60));
    println!("[OK] Fields filled with grades: {}", report.filled);
    println!("[OK] Fields marked as N/C or absent: {}", report.checked);
    println!("[ERRO] Errors: {}", report.errors);
    println!("[INFO] Total processed: {}", report.processed());

    if report.is_clean() {
        println!("\n[SUCESSO] Filling completed successfully! All grades were entered.");
    } else {
        println!(
            "\n[AVISO] Filling completed with {} errors. Check those fields manually.",
            report.errors
        );
    }
}
