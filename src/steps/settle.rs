use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::SettleStrategy;
use crate::portal::{Locator, Page, SelectOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The dependent control repopulated.
    Changed,
    /// Polling gave up; the page may still be loading.
    TimedOut,
    /// A fixed delay was slept.
    Slept,
}

/// Waits for the page to repopulate after a filter selection.
///
/// With a dependent control and the poll strategy, polls until its options
/// differ from `before` and at least one non-placeholder option exists.
/// Without a dependent control the poll strategy sleeps its fallback delay.
pub fn settle(
    page: &dyn Page,
    strategy: &SettleStrategy,
    dependent: Option<&Locator>,
    before: &[SelectOption],
) -> SettleOutcome {
    match (*strategy, dependent) {
        (SettleStrategy::Fixed(delay), _) => {
            thread::sleep(delay);
            SettleOutcome::Slept
        }
        (SettleStrategy::Poll { fallback, .. }, None) => {
            thread::sleep(fallback);
            SettleOutcome::Slept
        }
        (
            SettleStrategy::Poll {
                timeout, interval, ..
            },
            Some(locator),
        ) => {
            let start = Instant::now();
            loop {
                match page.options(locator) {
                    Ok(options) if repopulated(&options, before) => {
                        debug!(
                            "{locator} repopulated after {:?} with {} options",
                            start.elapsed(),
                            options.len()
                        );
                        return SettleOutcome::Changed;
                    }
                    Ok(_) => {}
                    Err(e) => debug!("{locator} not readable yet: {e}"),
                }

                if start.elapsed() >= timeout {
                    warn!("{locator} did not change within {timeout:?}; continuing");
                    return SettleOutcome::TimedOut;
                }
                thread::sleep(interval);
            }
        }
    }
}

fn repopulated(options: &[SelectOption], before: &[SelectOption]) -> bool {
    options != before && options.iter().any(|o| !o.value.is_empty())
}
