//! Tag triple derivation and publishing

use crate::domain::{increment, ReleaseType, TagTriple};
use crate::error::Result;
use crate::git::VcsBackend;
use crate::ui;
use semver::Version;

/// Derive the tags for the release following `current`.
///
/// Pure: the triple depends only on the incremented version's numbers.
pub fn derive_tag_triple(current: &Version, release_type: ReleaseType) -> Result<TagTriple> {
    derive_release(current, release_type).map(|(_, tags)| tags)
}

/// Like [derive_tag_triple], also returning the new version itself.
pub fn derive_release(
    current: &Version,
    release_type: ReleaseType,
) -> Result<(Version, TagTriple)> {
    let new_version = increment(current, release_type)?;
    let tags = TagTriple::from_version(&new_version);
    Ok((new_version, tags))
}

/// Points the tag triple at a commit and pushes it, replacing existing tags
pub struct TagPublisher<'a, B: VcsBackend + ?Sized> {
    backend: &'a B,
    remote: &'a str,
    target: &'a str,
}

impl<'a, B: VcsBackend + ?Sized> TagPublisher<'a, B> {
    pub fn new(backend: &'a B, remote: &'a str, target: &'a str) -> Self {
        TagPublisher {
            backend,
            remote,
            target,
        }
    }

    /// Tag `target` with all three names, then push all three.
    ///
    /// Tags and pushes are forced so that `v1` and `v1.2` move to the new
    /// commit. No push starts before every local tag is in place. A failure
    /// aborts immediately and nothing is rolled back.
    pub fn publish(&self, tags: &TagTriple) -> Result<()> {
        for tag in tags.names() {
            ui::display_status(&format!("tagging {} with: {}", self.target, tag));
            self.backend.tag(tag, self.target, true)?;
        }

        for tag in tags.names() {
            ui::display_status(&format!("pushing tag {} to remote", tag));
            self.backend.push_tag(self.remote, tag, true)?;
        }

        ui::display_success(&format!("published {}", tags));
        Ok(())
    }
}
