//! Domain logic - pure versioning rules independent of git operations

pub mod tag;
pub mod version;

pub use tag::{TagGlob, TagTriple};
pub use version::{
    compare_descending, increment, is_valid_version, parse_version_tag, ReleaseType,
    BASELINE_VERSION,
};
