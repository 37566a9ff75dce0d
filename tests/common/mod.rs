#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use anyhow::Result;
use gradefill::config::{PortalConfig, SettleStrategy};
use gradefill::console::{Cancelled, Prompter};
use gradefill::portal::{
    FieldState, Locator, Page, PageError, RawCell, RawInput, RawRow, SelectOption,
};

/// Interactions recorded by [`FakePage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Goto(String),
    Typed(Locator, String),
    Assigned(Locator, String),
    Clicked(Locator),
    Selected(Locator, String),
}

/// An in-memory page: elements exist when registered, interactions are
/// recorded, and selecting a value can repopulate another select.
#[derive(Default)]
pub struct FakePage {
    elements: RefCell<HashMap<Locator, FieldState>>,
    options: RefCell<HashMap<Locator, Vec<SelectOption>>>,
    cascades: HashMap<(Locator, String), (Locator, Vec<SelectOption>)>,
    table: Option<(Locator, Vec<RawRow>)>,
    after_click: HashMap<Locator, String>,
    url: RefCell<String>,
    calls: RefCell<Vec<Call>>,
}

pub fn ready() -> FieldState {
    FieldState {
        enabled: true,
        visible: true,
        checked: false,
        readonly: false,
    }
}

pub fn option(value: &str, label: &str) -> SelectOption {
    SelectOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, locator: Locator, state: FieldState) -> Self {
        self.elements.borrow_mut().insert(locator, state);
        self
    }

    /// A writable grade input with id `field_id`.
    pub fn with_field(self, field_id: &str) -> Self {
        self.with_element(Locator::id(field_id), ready())
    }

    /// The not-counted checkbox paired with `field_id`.
    pub fn with_checkbox(self, portal: &PortalConfig, field_id: &str, checked: bool) -> Self {
        let state = FieldState { checked, ..ready() };
        self.with_element(Locator::id(&portal.checkbox_id(field_id)), state)
    }

    pub fn with_options(self, select: Locator, options: Vec<SelectOption>) -> Self {
        self.options.borrow_mut().insert(select, options);
        self
    }

    pub fn with_cascade(
        mut self,
        select: Locator,
        value: &str,
        dependent: Locator,
        options: Vec<SelectOption>,
    ) -> Self {
        self.cascades
            .insert((select, value.to_string()), (dependent, options));
        self
    }

    pub fn with_table(mut self, table: Locator, rows: Vec<RawRow>) -> Self {
        self.table = Some((table, rows));
        self
    }

    /// Clicking `locator` moves the page to `url`.
    pub fn with_redirect(mut self, locator: Locator, url: &str) -> Self {
        self.after_click.insert(locator, url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn typed(&self) -> Vec<(Locator, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Typed(l, v) => Some((l, v)),
                _ => None,
            })
            .collect()
    }

    pub fn clicked(&self) -> Vec<Locator> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Clicked(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn selected(&self) -> Vec<(Locator, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Selected(l, v) => Some((l, v)),
                _ => None,
            })
            .collect()
    }

    pub fn is_checked(&self, locator: &Locator) -> bool {
        self.elements
            .borrow()
            .get(locator)
            .map(|s| s.checked)
            .unwrap_or(false)
    }

    fn exists(&self, locator: &Locator) -> bool {
        self.elements.borrow().contains_key(locator)
            || self.options.borrow().contains_key(locator)
            || matches!(&self.table, Some((table, _)) if table == locator)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Page for FakePage {
    fn goto(&self, url: &str) -> Result<(), PageError> {
        *self.url.borrow_mut() = url.to_string();
        self.record(Call::Goto(url.to_string()));
        Ok(())
    }

    fn current_url(&self) -> Result<String, PageError> {
        Ok(self.url.borrow().clone())
    }

    fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), PageError> {
        if self.exists(locator) {
            Ok(())
        } else {
            Err(PageError::Timeout {
                locator: locator.clone(),
                after: timeout,
            })
        }
    }

    fn field_state(&self, locator: &Locator) -> Result<FieldState, PageError> {
        self.elements
            .borrow()
            .get(locator)
            .copied()
            .ok_or_else(|| PageError::NotFound(locator.clone()))
    }

    fn click(&self, locator: &Locator) -> Result<(), PageError> {
        {
            let mut elements = self.elements.borrow_mut();
            let state = elements
                .get_mut(locator)
                .ok_or_else(|| PageError::NotFound(locator.clone()))?;
            state.checked = !state.checked;
        }
        if let Some(url) = self.after_click.get(locator) {
            *self.url.borrow_mut() = url.clone();
        }
        self.record(Call::Clicked(locator.clone()));
        Ok(())
    }

    fn type_text(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let state = self.field_state(locator)?;
        if state.readonly || !state.enabled {
            return Err(PageError::NotWritable(locator.clone()));
        }
        self.record(Call::Typed(locator.clone(), text.to_string()));
        Ok(())
    }

    fn assign_value(&self, locator: &Locator, value: &str) -> Result<(), PageError> {
        self.field_state(locator)?;
        self.record(Call::Assigned(locator.clone(), value.to_string()));
        Ok(())
    }

    fn options(&self, select: &Locator) -> Result<Vec<SelectOption>, PageError> {
        self.options
            .borrow()
            .get(select)
            .cloned()
            .ok_or_else(|| PageError::NotFound(select.clone()))
    }

    fn select_value(&self, select: &Locator, value: &str) -> Result<(), PageError> {
        let known = self.options(select)?.iter().any(|o| o.value == value);
        if !known {
            return Err(PageError::Script(format!("no option {value:?} in {select}")));
        }
        self.record(Call::Selected(select.clone(), value.to_string()));

        if let Some((dependent, options)) = self.cascades.get(&(select.clone(), value.to_string()))
        {
            self.options
                .borrow_mut()
                .insert(dependent.clone(), options.clone());
        }
        Ok(())
    }

    fn table_rows(&self, table: &Locator) -> Result<Vec<RawRow>, PageError> {
        match &self.table {
            Some((known, rows)) if known == table => Ok(rows.clone()),
            _ => Err(PageError::NotFound(table.clone())),
        }
    }
}

/// Answers prompts from a fixed script; an optional hook sees each prompt
/// first. Running out of answers behaves like Ctrl-C.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    hook: Option<Box<dyn FnMut(&str)>>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            hook: None,
            prompts: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        if let Some(hook) = self.hook.as_mut() {
            hook(prompt);
        }
        self.answers.pop_front().ok_or_else(|| Cancelled.into())
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }
}

/// Portal settings with every delay removed.
pub fn fast_portal() -> PortalConfig {
    PortalConfig {
        login_settle: Duration::ZERO,
        settle: SettleStrategy::Fixed(Duration::ZERO),
        ..PortalConfig::default()
    }
}

pub fn name_cell(name: &str) -> RawCell {
    RawCell {
        text: name.to_string(),
        input: None,
    }
}

pub fn input_cell(value: &str, field_id: &str) -> RawCell {
    RawCell {
        text: String::new(),
        input: Some(RawInput {
            name: field_id.to_string(),
            value: value.to_string(),
        }),
    }
}

/// A scraped table of `students` rows with `columns` grade inputs each.
/// Field ids are `nota-{row}-{col}` and values `{row},{col}`.
pub fn grade_table(students: usize, columns: usize) -> Vec<RawRow> {
    let mut rows = vec![RawRow::default()];
    for s in 1..=students {
        let mut cells = vec![name_cell(&format!("Aluno {s}\nRA 000{s}"))];
        cells.extend((1..=columns).map(|c| input_cell(&format!("{s},{c}"), &field_id(s, c))));
        rows.push(RawRow { cells });
    }
    rows
}

pub fn field_id(student: usize, column: usize) -> String {
    format!("nota-{student}-{column}")
}
