use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walk `root` and return every directory that directly contains a `.git`
/// entry, in traversal order.
///
/// The walk never descends into `.git` itself, never into directories
/// named in `ignore`, and never through symlinks. Unreadable subtrees are
/// skipped silently. Nested working copies below a repo are still found.
pub fn scan_repos(root: &Path, ignore: &[String]) -> Vec<PathBuf> {
    let mut repos = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            name != ".git" && !ignore.iter().any(|d| d.as_str() == name)
        });

    for entry in walker.filter_map(|e| e.ok()) {
        // With follow_links off a symlinked directory reports a symlink
        // file type, so it is neither descended into nor matched here.
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.path().join(".git").exists() {
            tracing::info!("found git repo: {}", entry.path().display());
            repos.push(entry.path().to_path_buf());
        }
    }

    repos
}
