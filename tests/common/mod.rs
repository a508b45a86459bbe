//! Shared fixtures: a bare "remote" and a working repository cloned from
//! nothing, wired together through an `origin` remote.

#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct Fixture {
    _dir: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl Fixture {
    /// Working repo with one commit and an empty bare `origin`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let remote = dir.path().join("remote.git");
        let work = dir.path().join("work");

        Repository::init_bare(&remote).expect("Could not init bare remote");
        let repo = Repository::init(&work).expect("Could not init git repo");
        repo.remote("origin", remote.to_str().expect("temp path is utf-8"))
            .expect("Could not add origin");

        let fixture = Fixture {
            _dir: dir,
            work,
            remote,
        };
        fixture.commit("Initial commit");
        fixture
    }

    pub fn repo(&self) -> Repository {
        Repository::open(&self.work).expect("Could not open work repo")
    }

    pub fn remote_repo(&self) -> Repository {
        Repository::open_bare(&self.remote).expect("Could not open remote repo")
    }

    /// Commit a change to README.md on HEAD and return the new commit id.
    pub fn commit(&self, message: &str) -> Oid {
        let repo = self.repo();
        let path = self.work.join("README.md");
        let previous = fs::read_to_string(&path).unwrap_or_default();
        fs::write(&path, format!("{}{}\n", previous, message)).expect("Could not write file");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("README.md"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");

        let sig = Signature::now("Test User", "test@example.com").expect("Could not build sig");
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Could not create commit")
    }

    pub fn head(&self) -> Oid {
        self.repo()
            .head()
            .expect("HEAD")
            .peel_to_commit()
            .expect("HEAD commit")
            .id()
    }

    /// Tag HEAD locally and push the tag to origin, outside of the code under test.
    pub fn publish_tag(&self, name: &str) {
        let repo = self.repo();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.tag_lightweight(name, head.as_object(), true)
            .expect("Could not create tag");
        let mut origin = repo.find_remote("origin").unwrap();
        let refspec = format!("+refs/tags/{0}:refs/tags/{0}", name);
        origin.push(&[refspec.as_str()], None).expect("Could not push tag");
    }

    /// Commit a tag on the remote points at, if it exists.
    pub fn remote_tag(&self, name: &str) -> Option<Oid> {
        self.remote_repo()
            .refname_to_id(&format!("refs/tags/{}", name))
            .ok()
    }

    pub fn local_tag(&self, name: &str) -> Option<Oid> {
        self.repo()
            .refname_to_id(&format!("refs/tags/{}", name))
            .ok()
    }

    pub fn remote_tag_names(&self) -> Vec<String> {
        let names = self.remote_repo().tag_names(None).unwrap();
        let mut names: Vec<String> = names.iter().flatten().map(str::to_string).collect();
        names.sort();
        names
    }
}

/// Whether a usable `git` executable is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
