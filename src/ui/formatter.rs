//! Pure formatting functions for UI output.
//!
//! Styling goes through `console`, which drops the colors on its own when
//! the output is not a terminal or `NO_COLOR` is set.

use console::style;

use crate::cli::orchestration::RunOutcome;
use crate::git::redact_credentials;

/// Format an error message; credentials in URLs are redacted.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), redact_credentials(message))
}

/// Format a success message with a green checkmark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status message with a yellow arrow.
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Summarise a run: version change, tags, and whether they were published.
pub fn format_outcome(outcome: &RunOutcome) -> String {
    let mut lines = vec![format!(
        "{} {} -> {}",
        style("Version:").bold(),
        outcome.previous_version,
        style(&outcome.version).green()
    )];
    for tag in outcome.tags.names() {
        lines.push(format!("  - {}", tag));
    }
    if !outcome.published {
        lines.push(format!(
            "{} dry run, nothing was tagged or pushed",
            style("→").yellow()
        ));
    }
    lines.join("\n")
}
