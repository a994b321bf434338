use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use gmc_core::error::GmcError;

/// The persistent URL → cache-key mapping.
///
/// Deliberately narrow, so a locking or embedded-store implementation can
/// replace the JSON file without touching call sites.
pub trait IndexStore {
    /// Current cache key recorded for `url`, if any.
    fn lookup(&self, url: &str) -> Option<&str>;

    /// Record `url → key`. Returns whether a write occurred; recording an
    /// already-correct entry is a no-op.
    fn record(&mut self, url: &str, key: &str) -> Result<bool, GmcError>;
}

/// `IndexStore` over a single JSON file with string keys and values.
/// Entries serialize in sorted order, so runs that change nothing produce
/// byte-identical output.
pub struct JsonIndex {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonIndex {
    /// Load the index at `path`. A missing file is an empty index; an
    /// unreadable or corrupt file is treated as empty with a logged
    /// warning, so a bad index never aborts a run.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "failed to parse {}: {e}; treating index as empty",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    "failed to read {}: {e}; treating index as empty",
                    path.display()
                );
                BTreeMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the whole file through a temp file in the same directory, so
    /// a partial write cannot clobber prior valid state.
    fn persist(&self) -> Result<(), GmcError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| GmcError::Serialization(e.to_string()))?;
        let dir = self.path.parent().ok_or_else(|| GmcError::Index {
            message: format!("index path has no parent: {}", self.path.display()),
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| GmcError::Index {
            message: format!("failed to replace {}: {e}", self.path.display()),
        })?;
        Ok(())
    }
}

impl IndexStore for JsonIndex {
    fn lookup(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    fn record(&mut self, url: &str, key: &str) -> Result<bool, GmcError> {
        if self.entries.get(url).map(String::as_str) == Some(key) {
            return Ok(false);
        }
        self.entries.insert(url.to_string(), key.to_string());
        self.persist()?;
        Ok(true)
    }
}

/// In-memory store for deterministic tests.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: BTreeMap<String, String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IndexStore for MemoryIndex {
    fn lookup(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    fn record(&mut self, url: &str, key: &str) -> Result<bool, GmcError> {
        if self.entries.get(url).map(String::as_str) == Some(key) {
            return Ok(false);
        }
        self.entries.insert(url.to_string(), key.to_string());
        Ok(true)
    }
}
