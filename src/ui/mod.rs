//! User-facing output.
//!
//! - `formatter` - pure formatting of messages and run summaries
//! - this module - printing them to the terminal / CI log

use crate::cli::orchestration::RunOutcome;

pub mod formatter;

pub use formatter::{format_error, format_outcome, format_status, format_success};

/// Print an error message to stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a success message.
pub fn display_success(message: &str) {
    println!("{}", format_success(message));
}

/// Print a progress message.
pub fn display_status(message: &str) {
    println!("{}", format_status(message));
}

/// Print the summary of a finished run.
pub fn display_outcome(outcome: &RunOutcome) {
    println!("{}", format_outcome(outcome));
}
