use std::path::{Path, PathBuf};

use gmc_core::error::GmcError;

/// Classification of one populate argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoRef {
    /// A local working copy; the path doubles as the clone source.
    Local(PathBuf),
    /// A raw repository URL, used verbatim as both the canonical URL and
    /// the clone source.
    Url(String),
}

/// Classify a raw argument.
///
/// URL-shaped strings are URL references. Everything else is a filesystem
/// path: it must exist, and it is a local repo only if it directly
/// contains a `.git` entry.
pub fn classify(arg: &str) -> Result<RepoRef, GmcError> {
    if looks_like_url(arg) {
        return Ok(RepoRef::Url(arg.to_string()));
    }

    let path = Path::new(arg);
    if !path.exists() {
        return Err(GmcError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.join(".git").exists() {
        return Ok(RepoRef::Local(path.to_path_buf()));
    }
    Err(GmcError::NotAWorkingCopy {
        path: path.to_path_buf(),
    })
}

/// True when the argument is URL-shaped rather than a filesystem path: an
/// explicit scheme (`https://…`, `ssh://…`, `git://…`, `file://…`) or the
/// scp-like `user@host:path` form.
fn looks_like_url(arg: &str) -> bool {
    if arg.contains("://") {
        return true;
    }
    if let Some(at) = arg.find('@') {
        let slash = arg.find('/').unwrap_or(arg.len());
        if let Some(colon) = arg.find(':') {
            if at < colon && colon < slash {
                return true;
            }
        }
    }
    false
}
