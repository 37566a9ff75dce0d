use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::portal::Locator;

/// Errors raised by a single page interaction.
///
/// Workflow steps propagate these as fatal; the field writer counts them per
/// field and keeps going.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("timed out after {after:?} waiting for {locator}")]
    Timeout { locator: Locator, after: Duration },

    #[error("element not found: {0}")]
    NotFound(Locator),

    #[error("element is disabled or hidden: {0}")]
    NotInteractable(Locator),

    #[error("element cannot be edited: {0}")]
    NotWritable(Locator),

    #[error("page script failed: {0}")]
    Script(String),

    #[error("browser error: {0}")]
    Browser(String),
}

/// An `<option>` of a `<select>` control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Interactive state of a form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct FieldState {
    pub enabled: bool,
    pub visible: bool,
    pub checked: bool,
    pub readonly: bool,
}

impl FieldState {
    pub fn is_interactable(&self) -> bool {
        self.enabled && self.visible
    }
}

/// The first `<input>` found inside a table cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawInput {
    pub name: String,
    pub value: String,
}

/// One `<td>` of a scraped table row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCell {
    pub text: String,
    pub input: Option<RawInput>,
}

/// One `<tr>` of a scraped table. Header rows have no `td` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

/// Element-level operations the workflow needs from a live page.
pub trait Page {
    fn goto(&self, url: &str) -> Result<(), PageError>;

    fn current_url(&self) -> Result<String, PageError>;

    /// Polls until an element matching `locator` is present, up to `timeout`.
    fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), PageError>;

    fn field_state(&self, locator: &Locator) -> Result<FieldState, PageError>;

    fn click(&self, locator: &Locator) -> Result<(), PageError>;

    /// Clears a text input and types `text` as keystrokes.
    ///
    /// Returns [`PageError::NotWritable`] when the element refuses keyboard
    /// input (e.g. `readonly`).
    fn type_text(&self, locator: &Locator, text: &str) -> Result<(), PageError>;

    /// Sets the `value` property directly and fires `input` and `change`.
    fn assign_value(&self, locator: &Locator, value: &str) -> Result<(), PageError>;

    fn options(&self, select: &Locator) -> Result<Vec<SelectOption>, PageError>;

    /// Selects the option with the given value and fires `change`.
    fn select_value(&self, select: &Locator, value: &str) -> Result<(), PageError>;

    fn table_rows(&self, table: &Locator) -> Result<Vec<RawRow>, PageError>;
}
