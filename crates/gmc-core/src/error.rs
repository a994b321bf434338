use std::path::PathBuf;

/// Central error type for the mirror cache.
#[derive(Debug, thiserror::Error)]
pub enum GmcError {
    #[error("git binary not found: {message}")]
    GitNotFound { message: String },

    #[error("git error: {message}")]
    GitCommand { message: String },

    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("not a git working copy: {path}")]
    NotAWorkingCopy { path: PathBuf },

    #[error("no {remote} remote configured in {path}")]
    NoRemote { path: PathBuf, remote: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("index error: {message}")]
    Index { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
