use crate::domain::TagGlob;
use crate::error::{BackendError, Result};
use crate::git::{is_remote_url, VcsBackend};
use git2::{
    Config, Cred, CredentialType, Direction, ObjectType, PushOptions, Remote, RemoteCallbacks,
    Repository as Git2Repo,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Git backend on top of libgit2
///
/// The repository handle is not `Sync`, so it lives behind a mutex. Calls are
/// sequential anyway; the lock is never contended.
pub struct Git2Backend {
    repo: Mutex<Git2Repo>,
}

impl Git2Backend {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Backend::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Backend {
            repo: Mutex::new(repo),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| BackendError::Git2("repository handle poisoned".to_string()).into())
    }
}

/// Look up a configured remote, or build an anonymous one for a URL.
fn find_remote<'r>(repo: &'r Git2Repo, remote: &str) -> Result<Remote<'r>> {
    let found = if is_remote_url(remote) {
        repo.remote_anonymous(remote)?
    } else {
        repo.find_remote(remote)?
    };
    Ok(found)
}

/// Credentials tried in order: git credential helper, the user part of an
/// `https://<token>@host` URL, ssh agent, ssh keys in `~/.ssh`, default.
fn credential_callbacks(config: &Config) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
                return Ok(cred);
            }
            if let Some(token) = username_from_url {
                return Cred::userpass_plaintext(token, "");
            }
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let username = username_from_url.unwrap_or("git");
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        Cred::default()
    });
    callbacks
}

impl VcsBackend for Git2Backend {
    fn list_remote_tags(&self, remote: &str, pattern: &str) -> Result<Vec<String>> {
        let glob = TagGlob::new(pattern)?;
        let repo = self.lock()?;
        let config = repo.config()?;
        let mut remote = find_remote(&repo, remote)?;

        let connection =
            remote.connect_auth(Direction::Fetch, Some(credential_callbacks(&config)), None)?;

        let mut tags: Vec<String> = connection
            .list()?
            .iter()
            .filter(|head| glob.matches_ref(head.name()))
            .filter_map(|head| head.name().strip_prefix("refs/tags/"))
            .filter(|name| !name.ends_with("^{}"))
            .map(str::to_string)
            .collect();

        // Same order `git ls-remote --sort=refname` produces.
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    fn tag(&self, name: &str, target: &str, force: bool) -> Result<()> {
        let repo = self.lock()?;
        let object = repo.revparse_single(target)?.peel(ObjectType::Commit)?;
        repo.tag_lightweight(name, &object, force)?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()> {
        let repo = self.lock()?;
        let config = repo.config()?;
        let mut remote = find_remote(&repo, remote)?;

        let reference = format!("refs/tags/{}", name);
        let refspec = if force {
            format!("+{0}:{0}", reference)
        } else {
            format!("{0}:{0}", reference)
        };

        let mut rejection: Option<(String, String)> = None;
        {
            let mut callbacks = credential_callbacks(&config);
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejection = Some((refname.to_string(), message.to_string()));
                }
                Ok(())
            });

            let mut push_options = PushOptions::new();
            push_options.remote_callbacks(callbacks);
            remote.push(&[refspec.as_str()], Some(&mut push_options))?;
        }

        match rejection {
            Some((reference, message)) => {
                Err(BackendError::PushRejected { reference, message }.into())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn repo_with_commit(dir: &Path) -> Git2Repo {
        let repo = Git2Repo::init(dir).unwrap();
        {
            let sig = Signature::now("Test User", "test@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_tag_force_moves_existing_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_with_commit(dir.path());
        let first = repo.head().unwrap().target().unwrap();
        let backend = Git2Backend::from_git2(repo);

        backend.tag("v1", "HEAD", false).unwrap();
        assert!(backend.tag("v1", "HEAD", false).is_err());
        backend.tag("v1", "HEAD", true).unwrap();

        let repo = backend.lock().unwrap();
        let tagged = repo.refname_to_id("refs/tags/v1").unwrap();
        assert_eq!(tagged, first);
    }

    #[test]
    fn test_tag_unknown_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Git2Backend::from_git2(repo_with_commit(dir.path()));
        let err = backend.tag("v1", "does-not-exist", true).unwrap_err();
        assert!(err.is_backend());
    }

    #[test]
    fn test_push_to_missing_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Git2Backend::from_git2(repo_with_commit(dir.path()));
        backend.tag("v1", "HEAD", true).unwrap();
        assert!(backend.push_tag("origin", "v1", true).is_err());
    }
}
