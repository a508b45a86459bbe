use crate::error::{Result, TagSemverError};
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Version a repository starts from when the remote has no version tags yet.
pub const BASELINE_VERSION: Version = Version::new(0, 0, 0);

/// Longest version string accepted as a tag, counted before trimming.
const MAX_VERSION_LENGTH: usize = 256;

/// Largest value accepted for a major, minor or patch component (2^53 - 1).
const MAX_COMPONENT: u64 = 9_007_199_254_740_991;

/// Kind of increment applied to the latest published version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

impl ReleaseType {
    pub const ALL: [ReleaseType; 3] = [ReleaseType::Patch, ReleaseType::Minor, ReleaseType::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = TagSemverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(ReleaseType::Patch),
            "minor" => Ok(ReleaseType::Minor),
            "major" => Ok(ReleaseType::Major),
            _ => Err(TagSemverError::InvalidReleaseType(s.to_string())),
        }
    }
}

/// Parses a version tag such as `v1.2.3` or `v2.0.0-rc.1+build.5`.
///
/// A single leading `v` is accepted. Partial versions (`v1`, `v1.2`) and
/// anything else that is not a complete `MAJOR.MINOR.PATCH` yield `None`,
/// as do tags longer than 256 bytes and components above 2^53 - 1.
pub fn parse_version_tag(tag: &str) -> Option<Version> {
    if tag.len() > MAX_VERSION_LENGTH {
        return None;
    }
    let trimmed = tag.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let version = Version::parse(raw).ok()?;
    if [version.major, version.minor, version.patch]
        .iter()
        .any(|&component| component > MAX_COMPONENT)
    {
        return None;
    }
    Some(version)
}

/// Returns true when `tag` is a fully compliant version.
pub fn is_valid_version(tag: &str) -> bool {
    parse_version_tag(tag).is_some()
}

/// Applies `release_type` to `version`.
///
/// A pre-release is first promoted to the release it precedes, so
/// `1.3.0-rc.1` bumped by `minor` is `1.3.0` rather than `1.4.0`.
/// Build metadata never survives an increment.
pub fn increment(version: &Version, release_type: ReleaseType) -> Result<Version> {
    let overflow = || TagSemverError::increment(version, release_type, "component overflow");
    let is_prerelease = !version.pre.is_empty();

    let (major, minor, patch) = match release_type {
        ReleaseType::Major => {
            let major = if is_prerelease && version.minor == 0 && version.patch == 0 {
                version.major
            } else {
                version.major.checked_add(1).ok_or_else(overflow)?
            };
            (major, 0, 0)
        }
        ReleaseType::Minor => {
            let minor = if is_prerelease && version.patch == 0 {
                version.minor
            } else {
                version.minor.checked_add(1).ok_or_else(overflow)?
            };
            (version.major, minor, 0)
        }
        ReleaseType::Patch => {
            let patch = if is_prerelease {
                version.patch
            } else {
                version.patch.checked_add(1).ok_or_else(overflow)?
            };
            (version.major, version.minor, patch)
        }
    };

    Ok(Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    })
}

/// Orders versions by semantic precedence, greatest first.
///
/// Build metadata does not take part in precedence.
pub fn compare_descending(a: &Version, b: &Version) -> Ordering {
    precedence(b, a)
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then_with(|| a.minor.cmp(&b.minor))
        .then_with(|| a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}
