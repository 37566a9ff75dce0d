use anyhow::Result;
use tracing::info;

use crate::config::{Course, PortalConfig, COURSES, TERMS};
use crate::console::{self, Prompter};
use crate::portal::{Page, SelectOption};
use crate::steps::settle::settle;

/// The course, class and term the gradebook is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub course: Course,
    pub class: SelectOption,
    pub term: String,
}

pub fn term_label(term: &str) -> String {
    format!("{}º Trimestre", term)
}

/// Walks the course → class → term filters, asking the operator at each
/// stage and waiting for the page to repopulate after every change.
pub fn configure_filters(
    page: &dyn Page,
    prompter: &mut dyn Prompter,
    portal: &PortalConfig,
) -> Result<Selection> {
    println!("\n{}", "=".repeat(60));
    println!("FILTER SETUP");
    println!("{}", "=".repeat(60));

    // Course
    let labels: Vec<&str> = COURSES.iter().map(|c| c.label).collect();
    let course = COURSES[console::choose(prompter, "Select the course:", &labels)?];

    let before = page.options(&portal.class_select).unwrap_or_default();
    page.select_value(&portal.course_select, course.code)?;
    println!("[OK] Selected: {}", course.label);
    settle(page, &portal.settle, Some(&portal.class_select), &before);

    // Class
    let classes = available_classes(&page.options(&portal.class_select)?);
    if classes.is_empty() {
        anyhow::bail!("No classes are available for {}", course.label);
    }
    let labels: Vec<&str> = classes.iter().map(|c| c.label.as_str()).collect();
    let class = classes[console::choose(prompter, "Available classes:", &labels)?].clone();

    page.select_value(&portal.class_select, &class.value)?;
    println!("[OK] Selected: {}", class.label);
    settle(page, &portal.settle, None, &[]);

    // Term
    let labels: Vec<String> = TERMS.iter().map(|t| term_label(t)).collect();
    let term = TERMS[console::choose(prompter, "Select the term:", &labels)?].to_string();

    page.select_value(&portal.term_select, &term)?;
    println!("[OK] Selected: {}", term_label(&term));
    settle(page, &portal.settle, None, &[]);

    info!(course = course.key, class = %class.label, term = %term, "Filters applied");
    println!("\n[OK] Filters configured.");

    Ok(Selection {
        course,
        class,
        term,
    })
}

/// Options with a value; the portal's placeholder entry has none.
pub fn available_classes(options: &[SelectOption]) -> Vec<SelectOption> {
    options
        .iter()
        .filter(|o| !o.value.trim().is_empty())
        .cloned()
        .collect()
}
