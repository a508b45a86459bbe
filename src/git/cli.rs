//! System git backend
//!
//! Every operation is a single `git` subprocess run inside the configured
//! repository. Output is parsed from stdout; a non-zero exit becomes a
//! [BackendError::CommandFailed] carrying stderr.

use crate::error::{BackendError, Result, TagSemverError};
use crate::git::{redact_credentials, VcsBackend};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Git backend using the `git` executable found on `PATH`
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        GitCli {
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo_path);
        // Fail instead of waiting for credentials on a CI runner.
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    /// Run `git <args>` and return its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let command = redact_credentials(&args.join(" "));

        let output = self
            .git_cmd()
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: redact_credentials(stderr.trim()),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VcsBackend for GitCli {
    fn list_remote_tags(&self, remote: &str, pattern: &str) -> Result<Vec<String>> {
        let stdout = self.run(&[
            "ls-remote",
            "--tags",
            "--refs",
            "--sort=refname",
            remote,
            pattern,
        ])?;
        parse_ls_remote_tags(&stdout)
    }

    fn tag(&self, name: &str, target: &str, force: bool) -> Result<()> {
        let mut args = vec!["tag"];
        if force {
            args.push("--force");
        }
        args.extend([name, target]);
        self.run(&args)?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()> {
        let refspec = format!("refs/tags/{}", name);
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend([remote, refspec.as_str()]);
        self.run(&args)?;
        Ok(())
    }
}

/// Extract tag names from `git ls-remote --tags` output.
///
/// Each line looks like `6ea4552d3d698610641bfa5952bbc57989718a05\trefs/tags/v1.2.3`.
/// Blank lines are skipped; anything else that does not fit is an error.
pub fn parse_ls_remote_tags(stdout: &str) -> Result<Vec<String>> {
    static ENTRY: OnceLock<Option<Regex>> = OnceLock::new();
    let entry = ENTRY
        .get_or_init(|| Regex::new(r"^\S+\s+refs/tags/(\S+)$").ok())
        .as_ref()
        .ok_or_else(|| BackendError::UnexpectedOutput("ls-remote entry pattern".to_string()))?;

    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            entry
                .captures(line)
                .and_then(|captures| captures.get(1))
                .map(|name| name.as_str().to_string())
                .ok_or_else(|| {
                    TagSemverError::from(BackendError::UnexpectedOutput(line.to_string()))
                })
        })
        .collect()
}
