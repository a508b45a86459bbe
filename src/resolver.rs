//! Latest version discovery from the remote's version tags

use crate::domain::{compare_descending, parse_version_tag, BASELINE_VERSION};
use crate::error::{Result, TagSemverError};
use crate::git::VcsBackend;
use crate::runner;
use semver::Version;

/// Finds the current version from the version tags published on a remote
pub struct TagResolver<'a, B: VcsBackend + ?Sized> {
    backend: &'a B,
    remote: &'a str,
    pattern: &'a str,
}

impl<'a, B: VcsBackend + ?Sized> TagResolver<'a, B> {
    pub fn new(backend: &'a B, remote: &'a str, pattern: &'a str) -> Self {
        TagResolver {
            backend,
            remote,
            pattern,
        }
    }

    /// Query the remote and return the greatest valid version it carries.
    ///
    /// Read-only. See [latest_version] for how the listing is interpreted.
    pub fn resolve_latest_version(&self) -> Result<Version> {
        let tags = self.backend.list_remote_tags(self.remote, self.pattern)?;
        if runner::is_debug() {
            runner::debug(&format!("found version tags: {:?}", tags));
        }
        latest_version(&tags)
    }
}

/// Pick the greatest fully compliant version out of a raw tag listing.
///
/// - no tags at all: [BASELINE_VERSION], the first release starts from there
/// - partial or malformed names are skipped
/// - tags present but none valid: [TagSemverError::NoValidVersionTags]
pub fn latest_version(tags: &[String]) -> Result<Version> {
    if tags.is_empty() {
        return Ok(BASELINE_VERSION);
    }

    let mut versions: Vec<Version> = tags
        .iter()
        .filter_map(|tag| parse_version_tag(tag))
        .collect();
    versions.sort_by(compare_descending);

    versions
        .into_iter()
        .next()
        .ok_or_else(|| TagSemverError::NoValidVersionTags {
            tags: tags.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{BackendCall, FailOn, MockBackend};

    fn resolve(backend: &MockBackend) -> Result<Version> {
        TagResolver::new(backend, "origin", "v*").resolve_latest_version()
    }

    #[test]
    fn test_no_tags_resolves_to_baseline() {
        let backend = MockBackend::new();
        assert_eq!(resolve(&backend).unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_malformed_tags_are_ignored() {
        let backend = MockBackend::new().with_remote_tags(["v1.2.3", "not-a-version", "v2.0.0"]);
        assert_eq!(resolve(&backend).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_only_malformed_tags_is_an_error() {
        let backend = MockBackend::new().with_remote_tags(["foo", "bar"]);
        match resolve(&backend).unwrap_err() {
            TagSemverError::NoValidVersionTags { tags } => assert_eq!(tags, vec!["foo", "bar"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partial_tags_only_is_an_error() {
        let backend = MockBackend::new().with_remote_tags(["v1", "v1.2"]);
        assert!(matches!(
            resolve(&backend),
            Err(TagSemverError::NoValidVersionTags { .. })
        ));
    }

    #[test]
    fn test_lexicographic_listing_is_resorted() {
        // refname order puts v1.10.0 before v1.9.0
        let backend =
            MockBackend::new().with_remote_tags(["v1", "v1.10.0", "v1.2.0", "v1.9", "v1.9.0"]);
        assert_eq!(resolve(&backend).unwrap(), Version::new(1, 10, 0));
    }

    #[test]
    fn test_release_beats_its_prerelease() {
        let backend = MockBackend::new().with_remote_tags(["v2.0.0", "v2.0.0-rc.1", "v1.9.9"]);
        assert_eq!(resolve(&backend).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_prerelease_can_be_latest() {
        let backend = MockBackend::new().with_remote_tags(["v1.9.9", "v2.0.0-rc.1"]);
        assert_eq!(resolve(&backend).unwrap().to_string(), "2.0.0-rc.1");
    }

    #[test]
    fn test_queries_configured_remote_and_pattern() {
        let backend = MockBackend::new();
        TagResolver::new(&backend, "upstream", "v1.*")
            .resolve_latest_version()
            .unwrap();
        assert_eq!(
            backend.calls(),
            vec![BackendCall::ListRemoteTags {
                remote: "upstream".to_string(),
                pattern: "v1.*".to_string(),
            }]
        );
    }

    #[test]
    fn test_backend_failure_propagates() {
        let backend = MockBackend::new().fail_on(FailOn::ListRemoteTags);
        assert!(resolve(&backend).unwrap_err().is_backend());
    }
}
