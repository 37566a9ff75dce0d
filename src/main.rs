use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use gradefill::config::{
    BrowserConfig, PortalConfig, RunConfig, SettleMode, SettleStrategy, DEFAULT_PORTAL_URL,
};
use gradefill::console::TerminalPrompter;
use gradefill::logging;
use gradefill::workflow;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Portal username; asked interactively when omitted
    #[arg(long, short = 'u')]
    username: Option<String>,

    /// Base URL of the grading portal
    #[arg(long, default_value = DEFAULT_PORTAL_URL)]
    portal_url: String,

    /// Directory where the spreadsheet is exported and reloaded from
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Run the browser without a visible window
    #[arg(long)]
    headless: bool,

    /// Chrome/Chromium executable; auto-detected when omitted
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// How to wait after each filter change: 'poll' (watch the next control) or 'fixed' (sleep)
    #[arg(long, default_value = "poll")]
    settle: String,

    /// Settle delay in seconds (fixed sleep, or poll fallback)
    #[arg(long, default_value = "3")]
    settle_secs: f64,

    /// Log level for this tool when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level);

    let settle_mode = match SettleMode::from_str(&cli.settle) {
        Ok(mode) => mode,
        Err(_) => anyhow::bail!("Invalid settle mode: {}", cli.settle),
    };

    let config = RunConfig {
        portal: PortalConfig {
            base_url: cli.portal_url,
            settle: SettleStrategy::from_mode(settle_mode, cli.settle_secs),
            ..PortalConfig::default()
        },
        browser: BrowserConfig {
            headless: cli.headless,
            chrome_path: cli.chrome_path,
            ..BrowserConfig::default()
        },
        output_dir: cli.output_dir,
        username: cli.username,
    };

    let mut prompter = TerminalPrompter::new();
    // The outcome is reported on the console; there are no exit codes.
    let _ = workflow::run(&config, &mut prompter);

    Ok(())
}
