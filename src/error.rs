use thiserror::Error;

use crate::domain::ReleaseType;

/// Unified error type for git-tag-semver operations
#[derive(Error, Debug)]
pub enum TagSemverError {
    #[error("found version tags but no fully compliant version tag: {tags:?}")]
    NoValidVersionTags { tags: Vec<String> },

    #[error("cannot apply a {release_type} increment to version {version}: {reason}")]
    InvalidVersionIncrement {
        version: String,
        release_type: ReleaseType,
        reason: String,
    },

    #[error(transparent)]
    BackendOperation(#[from] BackendError),

    #[error("invalid release type '{0}': expected one of patch, minor, major")]
    InvalidReleaseType(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by a [crate::git::VcsBackend].
///
/// Messages never contain credentials: anything that may embed a remote URL is
/// passed through [crate::git::redact_credentials] before it is stored here.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("`git {command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to run `git {command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("libgit2: {0}")]
    Git2(String),

    #[error("unexpected remote tag entry: {0}")]
    UnexpectedOutput(String),

    #[error("remote rejected {reference}: {message}")]
    PushRejected { reference: String, message: String },
}

/// Convenience type alias for Results in git-tag-semver
pub type Result<T> = std::result::Result<T, TagSemverError>;

impl From<git2::Error> for BackendError {
    fn from(err: git2::Error) -> Self {
        BackendError::Git2(crate::git::redact_credentials(err.message()))
    }
}

impl From<git2::Error> for TagSemverError {
    fn from(err: git2::Error) -> Self {
        TagSemverError::BackendOperation(err.into())
    }
}

impl TagSemverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagSemverError::Config(msg.into())
    }

    /// Create an increment error for the given version and release type
    pub fn increment(
        version: impl ToString,
        release_type: ReleaseType,
        reason: impl Into<String>,
    ) -> Self {
        TagSemverError::InvalidVersionIncrement {
            version: version.to_string(),
            release_type,
            reason: reason.into(),
        }
    }

    /// True for failures raised by the VCS backend
    pub fn is_backend(&self) -> bool {
        matches!(self, TagSemverError::BackendOperation(_))
    }
}
