use regex::Regex;
use std::sync::LazyLock;

use crate::config::EXPORT_SUFFIX;

static DATE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4} a \d{2}/\d{2}/\d{4}").unwrap());
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]+").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Derives the export file name from the selected class label.
///
/// `"9º ANO A - 01/02/2025 a 30/11/2025"` becomes
/// `"9_ANO_A_Notas_Para_Edicao.xlsx"`.
#[must_use]
pub fn export_filename(class_label: &str) -> String {
    let base = DATE_RANGE_RE.replace_all(class_label, "");
    let base = NON_WORD_RE.replace_all(&base, "");
    let base = SPACES_RE.replace_all(base.trim(), "_");

    if base.is_empty() {
        format!("Turma{}", EXPORT_SUFFIX)
    } else {
        format!("{}{}", base, EXPORT_SUFFIX)
    }
}
