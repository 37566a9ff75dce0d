use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::{self, BufRead, IsTerminal, Write};
use thiserror::Error;

/// Raised when the operator interrupts a prompt (Ctrl-C, or end of input).
#[derive(Debug, Error)]
#[error("operation cancelled by the operator")]
pub struct Cancelled;

/// Returns true if `err` was caused by an operator interrupt.
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<Cancelled>())
}

/// Source of operator answers.
pub trait Prompter {
    /// Shows `prompt` and reads one line of input, without the line ending.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Like [`Prompter::ask`] but the typed characters are not echoed.
    fn ask_secret(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the controlling terminal.
///
/// Interactive terminals are read key by key in raw mode so Ctrl-C can be
/// turned into [`Cancelled`] instead of killing the process. Piped input is
/// read line by line.
#[derive(Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&mut self, prompt: &str, masked: bool) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        if !io::stdin().is_terminal() {
            return read_piped_line();
        }

        let _raw = RawModeGuard::enable()?;
        let mut line = String::new();

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Char('c') if ctrl => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    return Err(Cancelled.into());
                }
                KeyCode::Char('d') if ctrl && line.is_empty() => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    return Err(Cancelled.into());
                }
                KeyCode::Backspace => {
                    if line.pop().is_some() {
                        write!(stdout, "\x08 \x08")?;
                    }
                }
                KeyCode::Char(c) if !ctrl => {
                    line.push(c);
                    if masked {
                        write!(stdout, "*")?;
                    } else {
                        write!(stdout, "{}", c)?;
                    }
                }
                _ => {}
            }
            stdout.flush()?;
        }

        write!(stdout, "\r\n")?;
        stdout.flush()?;
        Ok(line)
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt, false)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt, true)
    }
}

fn read_piped_line() -> Result<String> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(Cancelled.into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// A yes/no answer in any of the accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" | "sim" | "y" | "yes" => Some(Answer::Yes),
            "n" | "não" | "nao" | "no" => Some(Answer::No),
            _ => None,
        }
    }
}

/// Parses a 1-based menu choice into a 0-based index.
#[must_use]
pub fn parse_menu_choice(input: &str, count: usize) -> Option<usize> {
    let n = input.trim().parse::<usize>().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Prints a numbered menu and asks until a valid entry is chosen.
pub fn choose<S: AsRef<str>>(
    prompter: &mut dyn Prompter,
    title: &str,
    entries: &[S],
) -> Result<usize> {
    println!("\n{}", title);
    for (i, entry) in entries.iter().enumerate() {
        println!("{}. {}", i + 1, entry.as_ref());
    }

    let prompt = format!("\nEnter a number (1-{}): ", entries.len());
    loop {
        let input = prompter.ask(&prompt)?;
        match parse_menu_choice(&input, entries.len()) {
            Some(index) => return Ok(index),
            None => println!(
                "[ERRO] Invalid option. Enter a number between 1 and {}.",
                entries.len()
            ),
        }
    }
}

/// Asks a yes/no question until one of the accepted spellings is given.
pub fn confirm(prompter: &mut dyn Prompter, prompt: &str) -> Result<Answer> {
    loop {
        let input = prompter.ask(prompt)?;
        match Answer::parse(&input) {
            Some(answer) => return Ok(answer),
            None => println!("[ERRO] Invalid answer. Type 's' for yes or 'n' for no."),
        }
    }
}
