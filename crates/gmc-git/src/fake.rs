//! Deterministic in-memory `GitClient` for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gmc_core::error::GmcError;

use crate::GitClient;

/// One recorded git operation, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    RemoteGetUrl {
        repo: PathBuf,
        remote: String,
    },
    RemoteSetUrl {
        repo: PathBuf,
        remote: String,
        url: String,
    },
    CloneMirror {
        source: String,
        dest: PathBuf,
    },
    FetchAll {
        mirror: PathBuf,
    },
}

/// Test double for `GitClient`: scripted origin URLs, optional failure
/// injection, full call recording. `clone_mirror` creates the destination
/// directory so mirror-existence checks observe the same state transitions
/// as with the real binary.
#[derive(Default)]
pub struct FakeGit {
    origin_urls: HashMap<PathBuf, String>,
    fail_clone: bool,
    fail_fetch: bool,
    calls: Mutex<Vec<GitCall>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the origin URL that `remote_get_url` reports for `repo`.
    pub fn with_origin(mut self, repo: &Path, url: &str) -> Self {
        self.origin_urls.insert(repo.to_path_buf(), url.to_string());
        self
    }

    /// Make every `clone_mirror` fail without creating the destination.
    pub fn failing_clone(mut self) -> Self {
        self.fail_clone = true;
        self
    }

    /// Make every `fetch_all` fail.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// All operations invoked so far, in order.
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: GitCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GitClient for FakeGit {
    fn remote_get_url(&self, repo: &Path, remote: &str) -> Result<Option<String>, GmcError> {
        self.record(GitCall::RemoteGetUrl {
            repo: repo.to_path_buf(),
            remote: remote.to_string(),
        });
        if remote != "origin" {
            return Ok(None);
        }
        Ok(self.origin_urls.get(repo).cloned())
    }

    fn remote_set_url(&self, repo: &Path, remote: &str, url: &str) -> Result<(), GmcError> {
        self.record(GitCall::RemoteSetUrl {
            repo: repo.to_path_buf(),
            remote: remote.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn clone_mirror(&self, source: &str, dest: &Path) -> Result<(), GmcError> {
        self.record(GitCall::CloneMirror {
            source: source.to_string(),
            dest: dest.to_path_buf(),
        });
        if self.fail_clone {
            return Err(GmcError::GitCommand {
                message: format!("clone of {source} failed"),
            });
        }
        std::fs::create_dir_all(dest)?;
        Ok(())
    }

    fn fetch_all(&self, mirror: &Path) -> Result<(), GmcError> {
        self.record(GitCall::FetchAll {
            mirror: mirror.to_path_buf(),
        });
        if self.fail_fetch {
            return Err(GmcError::GitCommand {
                message: format!("fetch into {} failed", mirror.display()),
            });
        }
        Ok(())
    }
}
