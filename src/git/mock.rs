use crate::error::{BackendError, Result};
use crate::git::VcsBackend;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A backend call as recorded by [MockBackend]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ListRemoteTags { remote: String, pattern: String },
    Tag { name: String, target: String, force: bool },
    PushTag { remote: String, name: String, force: bool },
}

/// Operation a [MockBackend] should fail on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    ListRemoteTags,
    Tag(String),
    PushTag(String),
}

#[derive(Debug, Default)]
struct MockState {
    remote_tags: Vec<String>,
    local_tags: BTreeMap<String, String>,
    calls: Vec<BackendCall>,
    failures: Vec<FailOn>,
}

/// Mock backend for testing without actual git operations
///
/// The remote listing is returned exactly as seeded, without applying the
/// pattern, so tests control the raw order and content the resolver sees.
/// Tagging and pushing update in-memory state and follow git's force rules.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    /// Create a new mock with no tags anywhere
    pub fn new() -> Self {
        MockBackend::default()
    }

    /// Seed the remote listing, in the order it should be returned
    pub fn with_remote_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().remote_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Seed a local tag pointing at `target`
    pub fn with_local_tag(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.state().local_tags.insert(name.into(), target.into());
        self
    }

    /// Make the given operation fail
    pub fn fail_on(self, failure: FailOn) -> Self {
        self.state().failures.push(failure);
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    pub fn remote_tags(&self) -> Vec<String> {
        self.state().remote_tags.clone()
    }

    pub fn local_tags(&self) -> BTreeMap<String, String> {
        self.state().local_tags.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn injected(command: String) -> BackendError {
    BackendError::CommandFailed {
        command,
        status: "exit status: 128".to_string(),
        stderr: "fatal: injected failure".to_string(),
    }
}

impl VcsBackend for MockBackend {
    fn list_remote_tags(&self, remote: &str, pattern: &str) -> Result<Vec<String>> {
        let mut state = self.state();
        state.calls.push(BackendCall::ListRemoteTags {
            remote: remote.to_string(),
            pattern: pattern.to_string(),
        });

        if state.failures.contains(&FailOn::ListRemoteTags) {
            return Err(injected(format!("ls-remote --tags {} {}", remote, pattern)).into());
        }
        Ok(state.remote_tags.clone())
    }

    fn tag(&self, name: &str, target: &str, force: bool) -> Result<()> {
        let mut state = self.state();
        state.calls.push(BackendCall::Tag {
            name: name.to_string(),
            target: target.to_string(),
            force,
        });

        if state.failures.contains(&FailOn::Tag(name.to_string())) {
            return Err(injected(format!("tag {} {}", name, target)).into());
        }
        if !force && state.local_tags.contains_key(name) {
            return Err(BackendError::CommandFailed {
                command: format!("tag {} {}", name, target),
                status: "exit status: 128".to_string(),
                stderr: format!("fatal: tag '{}' already exists", name),
            }
            .into());
        }
        state.local_tags.insert(name.to_string(), target.to_string());
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()> {
        let mut state = self.state();
        state.calls.push(BackendCall::PushTag {
            remote: remote.to_string(),
            name: name.to_string(),
            force,
        });

        if state.failures.contains(&FailOn::PushTag(name.to_string())) {
            return Err(injected(format!("push {} refs/tags/{}", remote, name)).into());
        }
        if !state.local_tags.contains_key(name) {
            return Err(BackendError::CommandFailed {
                command: format!("push {} refs/tags/{}", remote, name),
                status: "exit status: 1".to_string(),
                stderr: format!("error: src refspec refs/tags/{} does not match any", name),
            }
            .into());
        }

        let exists = state.remote_tags.iter().any(|tag| tag == name);
        if exists && !force {
            return Err(BackendError::PushRejected {
                reference: format!("refs/tags/{}", name),
                message: "already exists".to_string(),
            }
            .into());
        }
        if !exists {
            state.remote_tags.push(name.to_string());
        }
        Ok(())
    }
}
