//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature};

use commitra::git::SystemGit;

/// A throwaway git repository for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Runner that executes the system `git` inside this repository.
    pub fn git(&self) -> SystemGit {
        SystemGit::in_dir(self.dir.path())
    }

    /// Runner that executes the system `git` from a subdirectory.
    pub fn git_in(&self, rel: &str) -> SystemGit {
        let dir = self.dir.path().join(rel);
        std::fs::create_dir_all(&dir).expect("Failed to create subdirectory");
        SystemGit::in_dir(dir)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root, creating parent dirs.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    /// Add a path to the index.
    pub fn stage(&self, rel: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(rel)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Delete a file from the working tree and the index.
    pub fn remove_staged(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("Failed to remove file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(rel)).expect("Failed to remove from index");
        index.write().expect("Failed to write index");
    }

    /// Write and stage in one step.
    pub fn write_staged(&self, rel: &str, content: &str) {
        self.write(rel, content);
        self.stage(rel);
    }

    /// Commit whatever is in the index. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = Signature::now("Test User", "test@example.com")
            .expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Repository with one committed file, so later changes diff against HEAD.
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.write_staged("README.md", "# demo\n");
        repo.commit("chore: initial commit");
        repo
    }
}

/// `count` numbered lines, each ending in a newline.
pub fn numbered_lines(prefix: &str, count: usize) -> String {
    (1..=count).map(|i| format!("{prefix} {i}\n")).collect()
}
