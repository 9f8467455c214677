//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::Repository;

use incpush::bucket::{BucketLimits, SizeAccounting};
use incpush::push::{MessageTemplate, RunConfig};
use incpush::vcs::VcsKind;

/// A git working copy with an optional bare remote, both in temp directories.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    pub remote: Option<(tempfile::TempDir, Repository)>,
}

impl TestRepo {
    /// Create a new empty repository without a remote.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");
        config
            .set_str("push.default", "current")
            .expect("Failed to set push.default");

        Self {
            dir,
            repo,
            remote: None,
        }
    }

    /// Create a new empty repository with a bare `origin` remote.
    pub fn with_remote() -> Self {
        let mut test_repo = Self::new();
        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        let remote_repo =
            Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");

        test_repo
            .repo
            .remote(
                "origin",
                remote_dir.path().to_str().expect("Invalid remote path"),
            )
            .expect("Failed to add origin remote");

        test_repo.remote = Some((remote_dir, remote_repo));
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file of `len` bytes at a repository-relative path.
    pub fn write_file(&self, name: &str, len: usize) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, vec![b'x'; len]).expect("Failed to write test file");
    }

    /// Commit messages reachable from HEAD, oldest first. Empty for an unborn HEAD.
    pub fn commit_messages(&self) -> Vec<String> {
        messages_from(&self.repo, "HEAD")
    }

    /// Commit messages on the remote's copy of the current branch, oldest first.
    pub fn remote_commit_messages(&self) -> Vec<String> {
        let (_, remote) = self.remote.as_ref().expect("Repository has no remote");
        match self.current_branch() {
            Some(branch) => messages_from(remote, &format!("refs/heads/{}", branch)),
            None => Vec::new(),
        }
    }

    /// Files recorded in the tree of the HEAD commit.
    pub fn head_tree_len(&self) -> usize {
        self.repo
            .head()
            .and_then(|h| h.peel_to_tree())
            .map(|t| t.len())
            .unwrap_or(0)
    }

    fn current_branch(&self) -> Option<String> {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(|s| s.to_string()))
    }

    /// A run configuration for the git backend pointing at this repository.
    pub fn config(&self, max_files: usize, max_size_mb: f64, dry_run: bool) -> RunConfig {
        RunConfig {
            repo_path: self.dir.path().to_path_buf(),
            vcs: VcsKind::Git,
            dry_run,
            limits: BucketLimits {
                max_files,
                max_size_mb,
                accounting: SizeAccounting::Lagged,
            },
            template: MessageTemplate::default(),
        }
    }
}

fn messages_from(repo: &Repository, refname: &str) -> Vec<String> {
    let Ok(target) = repo.revparse_single(refname) else {
        return Vec::new();
    };

    let mut revwalk = repo.revwalk().expect("Failed to create revwalk");
    revwalk.push(target.id()).expect("Failed to push revwalk start");
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)
        .expect("Failed to set sorting");

    revwalk
        .map(|oid| {
            let oid = oid.expect("Failed to walk commits");
            let commit = repo.find_commit(oid).expect("Failed to find commit");
            commit.message().unwrap_or_default().trim().to_string()
        })
        .collect()
}
