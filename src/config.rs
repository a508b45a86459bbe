use crate::error::{Result, TagSemverError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = "gittagsemver.toml";

/// Represents the complete configuration for git-tag-semver.
///
/// Every value the release workflow needs is here, so nothing downstream
/// falls back on an implicit default of its own.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_tag_pattern() -> String {
    "v*".to_string()
}

fn default_tag_target() -> String {
    "HEAD".to_string()
}

/// Which remote tags are read from and pushed to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Remote name or URL
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// Which tags count as version tags and what new tags point at.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    /// Ref glob used to list version tags on the remote
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,

    /// Revision the published tags point at
    #[serde(default = "default_tag_target")]
    pub target: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            pattern: default_tag_pattern(),
            target: default_tag_target(),
        }
    }
}

/// Git implementation used to talk to the repository and remote.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// The `git` executable on PATH
    #[default]
    GitCli,
    /// Built-in libgit2
    Libgit2,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Resolve and derive tags without creating or pushing them
    #[serde(default)]
    pub dry_run: bool,
}

/// Remote URL carrying a GitHub token as its user part.
pub fn github_remote_url(token: &str, repository: &str) -> String {
    format!("https://{}@github.com/{}.git", token, repository)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gittagsemver.toml` in current directory
/// 3. `.gittagsemver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => find_config_file(),
    };

    match path {
        Some(path) => parse_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| TagSemverError::config(format!("{}: {}", path.display(), e)))
}
