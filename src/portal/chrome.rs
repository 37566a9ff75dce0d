use anyhow::{Context, Result};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::console::{self, Answer, Prompter};
use crate::portal::{FieldState, Locator, Page, PageError, RawRow, SelectOption};

static QUIET_ARGS: [&str; 8] = [
    "--start-maximized",
    "--disable-blink-features=AutomationControlled",
    "--disable-extensions",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-logging",
    "--log-level=3",
    "--silent",
];

const FIELD_STATE_JS: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const boxed = !!(this.offsetWidth || this.offsetHeight || this.getClientRects().length);
    return JSON.stringify({
        enabled: !this.disabled,
        visible: boxed && style.visibility !== 'hidden',
        checked: !!this.checked,
        readonly: !!this.readOnly
    });
}"#;

const CLEAR_JS: &str = "function() { this.focus(); this.value = ''; }";

const ASSIGN_JS: &str = r#"function(v) {
    this.value = v;
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}"#;

const OPTIONS_JS: &str = r#"function() {
    return JSON.stringify(Array.from(this.options).map(o => ({
        value: o.value,
        label: (o.text || '').trim()
    })));
}"#;

const SELECT_JS: &str = r#"function(v) {
    if (!Array.from(this.options).some(o => o.value === v)) {
        return false;
    }
    this.value = v;
    this.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

const TABLE_JS: &str = r#"function() {
    return JSON.stringify(Array.from(this.querySelectorAll('tr')).map(tr => ({
        cells: Array.from(tr.querySelectorAll('td')).map(td => {
            const input = td.querySelector('input');
            return {
                text: (td.innerText || '').trim(),
                input: input ? { name: input.getAttribute('name') || '', value: input.value || '' } : null
            };
        })
    })));
}"#;

/// A browser process plus the tab the workflow drives.
///
/// Dropping the session kills the browser, so every exit path releases it.
pub struct Session {
    // Field order matters: the tab must go before the browser that owns it.
    page: ChromePage,
    _browser: Browser,
}

impl Session {
    pub fn start(config: &BrowserConfig) -> Result<Self> {
        info!(headless = config.headless, "Starting browser");

        let options = LaunchOptions {
            headless: config.headless,
            sandbox: false,
            enable_logging: false,
            window_size: Some(config.window_size),
            idle_browser_timeout: config.idle_timeout,
            path: config.chrome_path.clone(),
            args: QUIET_ARGS.iter().map(|arg| OsStr::new(*arg)).collect(),
            ..Default::default()
        };

        let browser = Browser::new(options).context("Failed to launch browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        info!("Browser started");
        Ok(Self {
            page: ChromePage { tab },
            _browser: browser,
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// Releases the browser, optionally letting the operator keep it open for
    /// a manual review first.
    pub fn stop(self, prompter: &mut dyn Prompter, prompt_user: bool) {
        if prompt_user {
            match console::confirm(prompter, "\n[INPUT] Close the browser automatically? (s/n): ") {
                Ok(Answer::No) => {
                    println!("[INFO] Browser kept open for manual review.");
                    // The browser dies with this process, so hold it here.
                    if prompter
                        .ask("[INPUT] Press Enter to close the browser when you are done: ")
                        .is_err()
                    {
                        debug!("Review prompt interrupted");
                    }
                }
                Ok(Answer::Yes) => {}
                Err(e) => debug!("Shutdown prompt failed: {e:#}"),
            }
        }

        drop(self);
        println!("[OK] Browser closed.");
    }
}

/// [`Page`] backed by a Chrome DevTools tab.
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    fn find(&self, locator: &Locator) -> Result<Element<'_>, PageError> {
        let found = match locator {
            Locator::Css(selector) => self.tab.find_element(selector),
            Locator::XPath(expression) => self.tab.find_element_by_xpath(expression),
        };
        found.map_err(|e| {
            debug!("find {locator} failed: {e}");
            PageError::NotFound(locator.clone())
        })
    }

    fn call(
        &self,
        element: &Element<'_>,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Option<Value>, PageError> {
        element
            .call_js_fn(function, args, false)
            .map(|remote| remote.value)
            .map_err(|e| PageError::Script(e.to_string()))
    }

    fn call_json<T: DeserializeOwned>(
        &self,
        element: &Element<'_>,
        function: &str,
    ) -> Result<T, PageError> {
        match self.call(element, function, Vec::new())? {
            Some(Value::String(raw)) => {
                serde_json::from_str(&raw).map_err(|e| PageError::Script(e.to_string()))
            }
            other => Err(PageError::Script(format!(
                "expected a JSON string from the page, got {other:?}"
            ))),
        }
    }
}

impl Page for ChromePage {
    fn goto(&self, url: &str) -> Result<(), PageError> {
        debug!("navigating to {url}");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| PageError::Browser(format!("navigation to {url} failed: {e}")))
    }

    fn current_url(&self) -> Result<String, PageError> {
        Ok(self.tab.get_url())
    }

    fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), PageError> {
        let waited = match locator {
            Locator::Css(selector) => self
                .tab
                .wait_for_element_with_custom_timeout(selector, timeout),
            Locator::XPath(expression) => self
                .tab
                .wait_for_xpath_with_custom_timeout(expression, timeout),
        };
        waited.map(|_| ()).map_err(|e| {
            debug!("wait for {locator} failed: {e}");
            PageError::Timeout {
                locator: locator.clone(),
                after: timeout,
            }
        })
    }

    fn field_state(&self, locator: &Locator) -> Result<FieldState, PageError> {
        let element = self.find(locator)?;
        self.call_json(&element, FIELD_STATE_JS)
    }

    fn click(&self, locator: &Locator) -> Result<(), PageError> {
        self.find(locator)?
            .click()
            .map(|_| ())
            .map_err(|e| PageError::Browser(format!("click on {locator} failed: {e}")))
    }

    fn type_text(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let element = self.find(locator)?;
        let state: FieldState = self.call_json(&element, FIELD_STATE_JS)?;
        if state.readonly || !state.enabled {
            return Err(PageError::NotWritable(locator.clone()));
        }

        self.call(&element, CLEAR_JS, Vec::new())?;
        element.type_into(text).map(|_| ()).map_err(|e| {
            warn!("typing into {locator} failed: {e}");
            PageError::NotWritable(locator.clone())
        })
    }

    fn assign_value(&self, locator: &Locator, value: &str) -> Result<(), PageError> {
        let element = self.find(locator)?;
        self.call(&element, ASSIGN_JS, vec![json!(value)])?;
        Ok(())
    }

    fn options(&self, select: &Locator) -> Result<Vec<SelectOption>, PageError> {
        let element = self.find(select)?;
        self.call_json(&element, OPTIONS_JS)
    }

    fn select_value(&self, select: &Locator, value: &str) -> Result<(), PageError> {
        let element = self.find(select)?;
        match self.call(&element, SELECT_JS, vec![json!(value)])? {
            Some(Value::Bool(true)) => Ok(()),
            _ => Err(PageError::Script(format!(
                "{select} has no option with value {value:?}"
            ))),
        }
    }

    fn table_rows(&self, table: &Locator) -> Result<Vec<RawRow>, PageError> {
        let element = self.find(table)?;
        self.call_json(&element, TABLE_JS)
    }
}
