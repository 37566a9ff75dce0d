use anyhow::Result;

use crate::gradebook::Gradebook;

/// The spreadsheet as reloaded after the operator's edits.
///
/// Cells are `None` when empty or explicitly missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl EditedSheet {
    pub fn student_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn student_name(&self, row: usize) -> Option<&str> {
        self.rows.get(row)?.first()?.as_deref()
    }

    /// Edited value for grade column `grade_col` (0-based, after the name).
    ///
    /// `None` means the row or column does not exist in the sheet at all;
    /// `Some(None)` is an empty cell.
    pub fn grade(&self, row: usize, grade_col: usize) -> Option<Option<&str>> {
        let cells = self.rows.get(row)?;
        if grade_col + 1 >= self.headers.len().max(cells.len()) {
            return None;
        }
        Some(cells.get(grade_col + 1).and_then(|cell| cell.as_deref()))
    }

    /// Checks that the sheet still lists the gradebook's students in the same
    /// order, so positional write-back cannot hit the wrong student.
    pub fn align(&self, gradebook: &Gradebook) -> Result<()> {
        if self.rows.len() != gradebook.rows.len() {
            anyhow::bail!(
                "Spreadsheet has {} student rows but the portal table has {}",
                self.rows.len(),
                gradebook.rows.len()
            );
        }

        for (index, student) in gradebook.rows.iter().enumerate() {
            let edited = self.student_name(index).unwrap_or("").trim();
            if edited != student.name.trim() {
                anyhow::bail!(
                    "Row {} lists {:?} but the portal has {:?}; do not reorder or rename students",
                    index + 2,
                    edited,
                    student.name
                );
            }
        }

        Ok(())
    }
}
