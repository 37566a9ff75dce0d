use anyhow::Result;
use std::fmt;
use std::thread;
use tracing::{debug, info};

use crate::config::PortalConfig;
use crate::console::Prompter;
use crate::portal::Page;

/// Portal login. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opens the login page and waits for the identity field.
pub fn open_login(page: &dyn Page, portal: &PortalConfig) -> Result<()> {
    println!("[INFO] Opening {}", portal.login_url());
    page.goto(&portal.login_url())?;
    page.wait_for(&portal.identity_field, portal.page_timeout)?;
    Ok(())
}

/// Asks for the username (unless already known) and the masked password.
pub fn ask_credentials(prompter: &mut dyn Prompter, username: Option<&str>) -> Result<Credentials> {
    let username = match username {
        Some(name) => name.to_string(),
        None => prompter.ask("[INPUT] Username: ")?.trim().to_string(),
    };
    let password = prompter.ask_secret("[INPUT] Password: ")?;

    Ok(Credentials { username, password })
}

/// Fills and submits the login form.
///
/// Returns `false` when the portal stays on a login URL after the settle
/// delay. Interaction failures are errors.
pub fn submit_credentials(
    page: &dyn Page,
    portal: &PortalConfig,
    credentials: &Credentials,
) -> Result<bool> {
    page.wait_for(&portal.identity_field, portal.page_timeout)?;

    page.type_text(&portal.identity_field, &credentials.username)?;
    page.type_text(&portal.credential_field, &credentials.password)?;
    page.click(&portal.submit_button)?;

    thread::sleep(portal.login_settle);

    let url = page.current_url()?;
    debug!("after login the portal is at {url}");
    let logged_in = !url.to_lowercase().contains("login");
    if logged_in {
        info!(user = %credentials.username, "Login accepted");
    }
    Ok(logged_in)
}

/// Opens the grade registration page and waits for the course filter.
pub fn open_grade_registry(page: &dyn Page, portal: &PortalConfig) -> Result<()> {
    println!("[INFO] Opening grade registration...");
    page.goto(&portal.registry_url())?;
    page.wait_for(&portal.course_select, portal.page_timeout)?;
    println!("[OK] Grade registration page loaded.");
    Ok(())
}
