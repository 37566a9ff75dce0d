/// A grade as shown on the portal, together with the id of the input that
/// holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeCell {
    pub value: String,
    pub field_id: String,
}

impl GradeCell {
    pub fn new(value: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            field_id: field_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub name: String,
    pub cells: Vec<GradeCell>,
}

/// The grade table of one class and term, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gradebook {
    /// Header labels; the first is the student column.
    pub columns: Vec<String>,
    pub rows: Vec<StudentRow>,
}

impl Gradebook {
    pub fn student_count(&self) -> usize {
        self.rows.len()
    }

    pub fn grade_column_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Displayed values, one row per student, padded to the column count.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.padded(row, |cell| cell.value.clone()))
            .collect()
    }

    /// Field identifiers, shaped exactly like [`Gradebook::display_rows`].
    pub fn field_id_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.padded(row, |cell| cell.field_id.clone()))
            .collect()
    }

    fn padded(&self, row: &StudentRow, pick: impl Fn(&GradeCell) -> String) -> Vec<String> {
        let mut out = Vec::with_capacity(self.columns.len());
        out.push(row.name.clone());
        out.extend(row.cells.iter().map(pick));
        out.resize(self.columns.len().max(1), String::new());
        out
    }
}

/// What an edited spreadsheet cell asks the writer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeEntry {
    /// Empty cell: the student was absent.
    Absent,
    /// The not-counted marker: the category does not count for this student.
    NotCounted,
    /// A grade to type into the field.
    Value(String),
}

impl GradeEntry {
    pub fn classify(cell: Option<&str>, marker: &str) -> Self {
        match cell {
            None => GradeEntry::Absent,
            Some(raw) => {
                let value = raw.trim();
                if value.eq_ignore_ascii_case(marker) {
                    GradeEntry::NotCounted
                } else {
                    GradeEntry::Value(value.to_string())
                }
            }
        }
    }

    /// Absent and not-counted both map to the portal's checkbox.
    pub fn uses_checkbox(&self) -> bool {
        matches!(self, GradeEntry::Absent | GradeEntry::NotCounted)
    }
}
