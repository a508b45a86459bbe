//! GitHub Actions runner protocol: debug logging, failure reporting and
//! step outputs.
//!
//! Outside a runner the same calls degrade to plain terminal output.

use crate::error::Result;
use crate::git::redact_credentials;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

/// File the runner collects step outputs from.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Set to `1` when the workflow runs with step debug logging.
pub const DEBUG_ENV: &str = "RUNNER_DEBUG";

/// Whether the process runs as a GitHub Actions step.
pub fn is_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// Whether step debug logging is enabled.
pub fn is_debug() -> bool {
    env::var(DEBUG_ENV).map(|v| v == "1").unwrap_or(false)
}

/// Emit a debug message; the runner only shows it with debug logging on.
pub fn debug(message: &str) {
    println!("{}", format_command("debug", message));
}

/// Report a failed run. Callers exit with a non-zero status afterwards.
pub fn set_failed(message: &str) {
    println!("{}", format_command("error", message));
}

/// Record a step output.
///
/// Appended to the file named by `GITHUB_OUTPUT` when set, otherwise printed
/// as `name=value`.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var_os(OUTPUT_FILE_ENV) {
        Some(path) if !path.is_empty() => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(format_output(name, value).as_bytes())?;
        }
        _ => println!("{}={}", name, value),
    }
    Ok(())
}

/// `::<command>::<message>` with the runner's escaping applied.
pub fn format_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(&redact_credentials(message)))
}

/// One entry of the output file; multi-line values use a heredoc delimiter.
pub fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') {
        let delimiter = format!("ghadelimiter_{}", std::process::id());
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    } else {
        format!("{}={}\n", name, value)
    }
}

fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
