use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::portal::Locator;

/// How the tool waits for the portal to repopulate a dependent control after
/// a filter changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleStrategy {
    /// Poll the dependent control until its options change, giving up after
    /// `timeout`. When there is nothing to observe, sleep `fallback`.
    Poll {
        timeout: Duration,
        interval: Duration,
        fallback: Duration,
    },
    /// Always sleep for the given duration.
    Fixed(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleMode {
    Poll,
    Fixed,
}

impl FromStr for SettleMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p" | "poll" => Ok(SettleMode::Poll),
            "f" | "fixed" => Ok(SettleMode::Fixed),
            _ => Err(()),
        }
    }
}

impl SettleStrategy {
    /// Builds a strategy from the CLI mode and a delay in seconds.
    ///
    /// For polling the delay is both the poll ceiling and the fallback sleep.
    pub fn from_mode(mode: SettleMode, secs: f64) -> Self {
        let delay = Duration::from_secs_f64(secs.max(0.0));
        match mode {
            SettleMode::Poll => SettleStrategy::Poll {
                timeout: delay.max(Duration::from_secs(1)) * 3,
                interval: Duration::from_millis(250),
                fallback: delay,
            },
            SettleMode::Fixed => SettleStrategy::Fixed(delay),
        }
    }
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::from_mode(SettleMode::Poll, 3.0)
    }
}

/// A course offered in the course filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub key: &'static str,
    pub label: &'static str,
    pub code: &'static str,
}

pub const COURSES: [Course; 2] = [
    Course {
        key: "FUND2",
        label: "Ensino Fundamental II",
        code: "3533",
    },
    Course {
        key: "MEDIO",
        label: "Ensino Médio",
        code: "3532",
    },
];

/// Term values accepted by the term filter; label is derived from the value.
pub const TERMS: [&str; 3] = ["1", "2", "3"];

/// Spreadsheet header labels: student name plus the grade categories.
pub const COLUMN_LABELS: [&str; 9] = [
    "Aluno",
    "VERIFICACAO PARCIAL",
    "VERIFICACAO GLOBAL",
    "ATIVIDADE 1",
    "ATIVIDADE 2",
    "ATIVIDADE 3",
    "ATIVIDADE 4",
    "PONTO OLIMPIADA",
    "MEDIA MANUAL",
];

pub const NOT_COUNTED_MARKER: &str = "N/C";
pub const EXPORT_SUFFIX: &str = "_Notas_Para_Edicao.xlsx";
pub const DEFAULT_PORTAL_URL: &str = "https://ec2galileu.com.br";

/// Everything the workflow knows about the grading portal's pages.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub identity_field: Locator,
    pub credential_field: Locator,
    pub submit_button: Locator,
    pub course_select: Locator,
    pub class_select: Locator,
    pub term_select: Locator,
    pub grade_table: Locator,
    pub checkbox_prefix: String,
    pub manual_average_tag: String,
    pub not_counted_marker: String,
    pub page_timeout: Duration,
    pub table_timeout: Duration,
    pub field_timeout: Duration,
    pub login_settle: Duration,
    pub settle: SettleStrategy,
}

impl PortalConfig {
    pub fn login_url(&self) -> String {
        format!("{}/professor", self.base_url.trim_end_matches('/'))
    }

    pub fn registry_url(&self) -> String {
        format!("{}/professor/registro-nota", self.base_url.trim_end_matches('/'))
    }

    /// Id of the "not counted / absent" checkbox paired with a grade field.
    pub fn checkbox_id(&self, field_id: &str) -> String {
        format!("{}{}", self.checkbox_prefix, field_id.to_lowercase())
    }

    /// Fields the portal computes itself and must not be written.
    pub fn is_manual_average(&self, field_id: &str) -> bool {
        field_id.to_lowercase().contains(&self.manual_average_tag)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PORTAL_URL.to_string(),
            identity_field: Locator::css("#identity"),
            credential_field: Locator::css("#credential"),
            submit_button: Locator::xpath("//button[contains(.,' Entrar')]"),
            course_select: Locator::css("#id_curso"),
            class_select: Locator::css("#id_turma"),
            term_select: Locator::css("#nr_periodo"),
            grade_table: Locator::css("#gridAlunos"),
            checkbox_prefix: "chk-nc-".to_string(),
            manual_average_tag: "media-manual".to_string(),
            not_counted_marker: NOT_COUNTED_MARKER.to_string(),
            page_timeout: Duration::from_secs(10),
            table_timeout: Duration::from_secs(15),
            field_timeout: Duration::from_secs(5),
            login_settle: Duration::from_secs(3),
            settle: SettleStrategy::default(),
        }
    }
}

/// Browser launch options.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_size: (u32, u32),
    /// Longest silence tolerated on the DevTools connection. Must outlast the
    /// offline editing pause.
    pub idle_timeout: Duration,
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_size: (1920, 1080),
            idle_timeout: Duration::from_secs(24 * 60 * 60),
            chrome_path: None,
        }
    }
}

/// Configuration for one run of the workflow.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub portal: PortalConfig,
    pub browser: BrowserConfig,
    pub output_dir: PathBuf,
    pub username: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            browser: BrowserConfig::default(),
            output_dir: PathBuf::from("."),
            username: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_mode_parses_short_and_long_names() {
        assert_eq!("poll".parse::<SettleMode>(), Ok(SettleMode::Poll));
        assert_eq!("F".parse::<SettleMode>(), Ok(SettleMode::Fixed));
        assert!("sleep".parse::<SettleMode>().is_err());
    }

    #[test]
    fn fixed_mode_uses_the_delay_verbatim() {
        assert_eq!(
            SettleStrategy::from_mode(SettleMode::Fixed, 1.5),
            SettleStrategy::Fixed(Duration::from_millis(1500))
        );
    }

    #[test]
    fn poll_mode_keeps_delay_as_fallback() {
        match SettleStrategy::from_mode(SettleMode::Poll, 2.0) {
            SettleStrategy::Poll {
                timeout, fallback, ..
            } => {
                assert_eq!(fallback, Duration::from_secs(2));
                assert_eq!(timeout, Duration::from_secs(6));
            }
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn portal_urls_and_checkbox_ids() {
        let portal = PortalConfig {
            base_url: "https://example.test/".to_string(),
            ..PortalConfig::default()
        };
        assert_eq!(portal.login_url(), "https://example.test/professor");
        assert_eq!(
            portal.registry_url(),
            "https://example.test/professor/registro-nota"
        );
        assert_eq!(portal.checkbox_id("Nota-VP-12"), "chk-nc-nota-vp-12");
        assert!(portal.is_manual_average("nota-MEDIA-MANUAL-3"));
        assert!(!portal.is_manual_average("nota-vp-3"));
    }
}
