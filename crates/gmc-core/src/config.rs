use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GmcError;

/// Environment variable overriding the cache root location.
pub const CACHE_DIR_ENV: &str = "GMC_CACHE_DIR";

/// Name of the URL → cache-key index file inside the cache root.
pub const INDEX_FILE: &str = "directory.json";

/// Tunables read from `<cache_root>/config.toml`. The file is optional;
/// every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory names the scanner never descends into. The `.git` marker
    /// directory is pruned unconditionally and is not part of this set.
    #[serde(default = "default_scan_ignore")]
    pub scan_ignore: Vec<String>,
}

fn default_scan_ignore() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scan_ignore: default_scan_ignore(),
        }
    }
}

impl CacheConfig {
    /// Resolve the cache root: the `GMC_CACHE_DIR` override when set,
    /// else `~/.git-mirror-cache`.
    pub fn cache_root() -> Result<PathBuf, GmcError> {
        if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let base = dirs::home_dir().ok_or_else(|| GmcError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".git-mirror-cache"))
    }

    /// Create the cache root if missing. Failure here is fatal to the run.
    pub fn ensure_root(cache_root: &Path) -> Result<(), GmcError> {
        std::fs::create_dir_all(cache_root)?;
        Ok(())
    }

    /// Returns the path to the optional config file.
    pub fn config_path(cache_root: &Path) -> PathBuf {
        cache_root.join("config.toml")
    }

    /// Returns the path to the directory index file.
    pub fn index_path(cache_root: &Path) -> PathBuf {
        cache_root.join(INDEX_FILE)
    }

    /// Returns the path to the append-only log for one invocation type.
    pub fn log_path(cache_root: &Path, invocation: &str) -> PathBuf {
        cache_root.join(format!("{invocation}.log"))
    }

    /// Load config from the cache root, or return defaults if no config
    /// file is present.
    pub fn load(cache_root: &Path) -> Result<Self, GmcError> {
        let path = Self::config_path(cache_root);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, GmcError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GmcError::Serialization(e.to_string()))
    }
}
