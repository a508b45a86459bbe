//! Main workflow orchestration logic
//!
//! Resolve the current version, derive the tag triple, publish it. Each step
//! runs only after the previous one succeeded; the first failure aborts the
//! run without retries.

use semver::Version;
use serde::Serialize;

use crate::config::Config;
use crate::domain::{ReleaseType, TagTriple};
use crate::error::Result;
use crate::git::VcsBackend;
use crate::publisher::{derive_release, TagPublisher};
use crate::resolver::TagResolver;
use crate::{runner, ui};

/// Settings for a single run, all explicit
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Remote name or URL tags are read from and pushed to
    pub remote: String,

    /// Ref glob selecting version tags
    pub tag_pattern: String,

    /// Revision the new tags point at
    pub target_ref: String,

    /// Preview mode - don't create tags or push
    pub dry_run: bool,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        RunSettings {
            remote: config.remote.name.clone(),
            tag_pattern: config.tags.pattern.clone(),
            target_ref: config.tags.target.clone(),
            dry_run: config.behavior.dry_run,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings::from_config(&Config::default())
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// Latest version found on the remote (0.0.0 when there was none)
    pub previous_version: Version,

    /// The version the new tags describe
    pub version: Version,

    /// Tags in publish order, serialized as an array of three strings
    pub tags: TagTriple,

    /// False for dry runs
    pub published: bool,
}

/// Computes and publishes the next version tags for a repository
pub struct TagSemverHandler<B: VcsBackend> {
    backend: B,
    settings: RunSettings,
}

impl<B: VcsBackend> TagSemverHandler<B> {
    pub fn new(backend: B, settings: RunSettings) -> Self {
        TagSemverHandler { backend, settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run the release for `release_type`.
    pub fn run(&self, release_type: ReleaseType) -> Result<RunOutcome> {
        let settings = &self.settings;

        let previous_version =
            TagResolver::new(&self.backend, &settings.remote, &settings.tag_pattern)
                .resolve_latest_version()?;
        ui::display_status(&format!("latest version on remote: {}", previous_version));

        let (version, tags) = derive_release(&previous_version, release_type)?;
        if runner::is_debug() {
            runner::debug(&format!("{} release tags: {}", release_type, tags));
        }

        let published = if settings.dry_run {
            ui::display_status(&format!("dry run, skipping publish of {}", tags));
            false
        } else {
            TagPublisher::new(&self.backend, &settings.remote, &settings.target_ref)
                .publish(&tags)?;
            true
        };

        Ok(RunOutcome {
            previous_version,
            version,
            tags,
            published,
        })
    }
}
