use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::console::{self, Answer, Prompter};

/// Blocks until the operator confirms the spreadsheet was edited and saved.
///
/// There is no timeout. An interrupt surfaces as [`console::Cancelled`].
pub fn await_edit(prompter: &mut dyn Prompter, path: &Path) -> Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("SPREADSHEET EDITING");
    println!("{}", "=".repeat(60));
    println!("[INFO] Open the file: {}", path.display());
    println!("[INFO] Edit the students' grades as needed and save the file.");
    println!("\nIMPORTANT:");
    println!("   - Leave the cell empty for students who were absent");
    println!("   - Write 'N/C' for activities that did not take place");
    println!("   - Use a comma as decimal separator: 7,5 instead of 7.5");
    println!("   - Do not change or reorder the student names");
    println!("\nClose the spreadsheet program completely before continuing!");

    loop {
        io::stdout().flush()?;
        match console::confirm(
            prompter,
            "\n[INPUT] Have you finished editing and saved the spreadsheet? (s/n): ",
        )? {
            Answer::Yes => {
                println!("[OK] Continuing with automatic filling...");
                return Ok(());
            }
            Answer::No => println!("[INFO] Waiting... finish editing and answer again."),
        }
    }
}
