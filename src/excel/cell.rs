/// What the workbook stored in a cell, before it was turned into text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellKind {
    Empty,
    Text,
    Float(f64),
    Int(i64),
    Bool,
    Date,
    Error,
}

/// A cell's display text together with its stored kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub value: String,
    pub kind: CellKind,
}

impl Cell {
    pub fn new(value: impl Into<String>, kind: CellKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::empty();
        }
        Self::new(value, CellKind::Text)
    }

    pub fn empty() -> Self {
        Self::new(String::new(), CellKind::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty || self.value.is_empty()
    }

    /// The stored number, when the workbook held this cell as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self.kind {
            CellKind::Float(f) => Some(f),
            _ => None,
        }
    }
}
