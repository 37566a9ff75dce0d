use anyhow::{Context, Result};
use std::fmt;
use tracing::error;

use crate::config::RunConfig;
use crate::console::{is_cancelled, Prompter};
use crate::gradebook::export_filename;
use crate::portal::{Page, Session};
use crate::steps::{self, WriteReport};

/// The stages of a run, used to label fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    StartBrowser,
    Login,
    OpenRegistry,
    Filters,
    Extract,
    EditGate,
    Load,
    WriteBack,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::StartBrowser => "starting the browser",
            Step::Login => "login",
            Step::OpenRegistry => "opening grade registration",
            Step::Filters => "filter setup",
            Step::Extract => "table extraction",
            Step::EditGate => "waiting for the spreadsheet edit",
            Step::Load => "loading the edited spreadsheet",
            Step::WriteBack => "automatic filling",
        };
        f.write_str(label)
    }
}

/// Runs the whole workflow against a freshly started browser, reports the
/// outcome, and always offers the browser for review before releasing it.
pub fn run(config: &RunConfig, prompter: &mut dyn Prompter) -> Result<WriteReport> {
    print_intro();

    let session = match Session::start(&config.browser).context(Step::StartBrowser) {
        Ok(session) => session,
        Err(e) => {
            report_outcome(&Err(e));
            anyhow::bail!("the browser could not be started");
        }
    };

    let outcome = run_steps(session.page(), config, prompter);
    report_outcome(&outcome);
    session.stop(prompter, true);
    outcome
}

/// Every step after the browser is up, in order. The first failure aborts.
pub fn run_steps(
    page: &dyn Page,
    config: &RunConfig,
    prompter: &mut dyn Prompter,
) -> Result<WriteReport> {
    let portal = &config.portal;

    steps::open_login(page, portal).context(Step::Login)?;
    let credentials =
        steps::ask_credentials(prompter, config.username.as_deref()).context(Step::Login)?;
    if !steps::submit_credentials(page, portal, &credentials).context(Step::Login)? {
        println!("[ERRO] Login failed - check your credentials");
        return Err(anyhow::anyhow!("the portal rejected the credentials")).context(Step::Login);
    }
    println!("[OK] Login successful!");

    steps::open_grade_registry(page, portal).context(Step::OpenRegistry)?;

    let selection = steps::configure_filters(page, prompter, portal).context(Step::Filters)?;

    let gradebook = steps::extract_gradebook(page, portal).context(Step::Extract)?;
    let path = steps::export_gradebook(
        &gradebook,
        &config.output_dir,
        &export_filename(&selection.class.label),
    )
    .context(Step::Extract)?;

    steps::await_edit(prompter, &path).context(Step::EditGate)?;

    let edited = steps::load_edited(&path).context(Step::Load)?;

    let report = steps::write_back(page, &gradebook, &edited, portal).context(Step::WriteBack)?;

    println!("\n[SUCESSO] PROCESS COMPLETED!");
    println!("\nFinal tips:");
    println!("   - Review the entered grades before finishing");
    println!("   - Save/submit the changes on the portal");
    println!("   - Keep a backup of the generated spreadsheet");

    Ok(report)
}

fn print_intro() {
    println!("\n{}", "=".repeat(60));
    println!("   GALILEU EC2 GRADE AUTOMATION");
    println!("{}", "=".repeat(60));
    println!("\nThis program will:");
    println!("1. Log into the portal");
    println!("2. Configure the filters (course, class, term)");
    println!("3. Export the current grades to an Excel spreadsheet");
    println!("4. Wait for you to edit the spreadsheet");
    println!("5. Fill every grade back into the portal automatically");
    println!("\n{}", "=".repeat(60));
}

fn report_outcome(outcome: &Result<WriteReport>) {
    match outcome {
        Ok(_) => println!("\n[OK] All steps were executed successfully!"),
        Err(e) if is_cancelled(e) => println!("\n[INFO] Operation cancelled by the operator."),
        Err(e) => {
            error!("run failed: {e:#}");
            println!("\n[ERRO] Error during {e:#}");
            println!("[ERRO] There were problems during the run.");
        }
    }
}
