use std::path::Path;

use gmc_core::cache_key;
use gmc_core::error::GmcError;
use gmc_git::GitClient;
use gmc_index::IndexStore;

use crate::reference::{classify, RepoRef};

/// Which state transition a mirror took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAction {
    /// The mirror was absent; a fresh mirror clone was created.
    Cloned,
    /// The mirror already existed; all refs were fetched into it.
    Fetched,
}

/// Outcome of populating one reference.
#[derive(Debug)]
pub struct PopulateOutcome {
    pub reference: String,
    pub result: Result<MirrorAction, GmcError>,
}

impl PopulateOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Populate the cache for every reference in order. A failure for one
/// reference is reported and never aborts the rest.
pub fn populate_all(
    refs: &[String],
    cache_root: &Path,
    git: &dyn GitClient,
    index: &mut dyn IndexStore,
) -> Vec<PopulateOutcome> {
    refs.iter()
        .map(|reference| {
            let result = populate_one(reference, cache_root, git, index);
            match &result {
                Ok(action) => tracing::info!("{reference}: {action:?}"),
                Err(GmcError::NoRemote { .. }) => {
                    tracing::warn!("no origin remote in {reference}, skipping");
                }
                Err(e) => tracing::error!("{reference}: {e}"),
            }
            PopulateOutcome {
                reference: reference.clone(),
                result,
            }
        })
        .collect()
}

/// Ensure one reference has a current mirror entry and index record.
///
/// Flow:
/// 1. Classify the reference (local working copy or raw URL)
/// 2. Resolve the canonical origin URL
/// 3. Derive the cache key and mirror path
/// 4. Clone the mirror if absent, else fetch all refs
/// 5. Re-point the mirror's origin at the canonical URL and update the
///    index (best-effort, regardless of step 4's outcome)
pub fn populate_one(
    reference: &str,
    cache_root: &Path,
    git: &dyn GitClient,
    index: &mut dyn IndexStore,
) -> Result<MirrorAction, GmcError> {
    let repo_ref = classify(reference)?;

    let (url, source) = match &repo_ref {
        RepoRef::Local(path) => {
            let url = git
                .remote_get_url(path, "origin")?
                .ok_or_else(|| GmcError::NoRemote {
                    path: path.clone(),
                    remote: "origin".to_string(),
                })?;
            (url, path.to_string_lossy().into_owned())
        }
        RepoRef::Url(url) => (url.clone(), url.clone()),
    };

    let key = cache_key::derive(&url);
    let mirror = cache_root.join(&key);

    let (action, vcs_result) = if mirror.exists() {
        tracing::info!("updating {url}");
        (MirrorAction::Fetched, git.fetch_all(&mirror))
    } else {
        tracing::info!("caching {url} -> {}", mirror.display());
        (MirrorAction::Cloned, git.clone_mirror(&source, &mirror))
    };

    // A local source path is not a persistent address: the stored remote
    // must always be the canonical URL. Both fix-ups run even when the
    // clone or fetch failed; their own failures are logged, not fatal.
    if let Err(e) = git.remote_set_url(&mirror, "origin", &url) {
        tracing::warn!("failed to set origin of {}: {e}", mirror.display());
    }
    match index.record(&url, &key) {
        Ok(true) => tracing::info!("recorded {url} -> {key}"),
        Ok(false) => {}
        Err(e) => tracing::warn!("failed to update index for {url}: {e}"),
    }

    vcs_result.map(|()| action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmc_git::fake::{FakeGit, GitCall};
    use gmc_index::MemoryIndex;
    use std::path::PathBuf;

    fn make_working_copy(parent: &Path, name: &str) -> PathBuf {
        let repo = parent.join(name);
        std::fs::create_dir_all(repo.join(".git")).unwrap();
        repo
    }

    #[test]
    fn test_first_populate_clones_second_fetches() {
        let cache = tempfile::tempdir().unwrap();
        let repos = tempfile::tempdir().unwrap();
        let repo = make_working_copy(repos.path(), "myrepo");

        let url = "https://example.com/repo.git";
        let git = FakeGit::new().with_origin(&repo, url);
        let mut index = MemoryIndex::new();
        let reference = repo.to_string_lossy().into_owned();

        let first = populate_one(&reference, cache.path(), &git, &mut index).unwrap();
        assert_eq!(first, MirrorAction::Cloned);

        let key = cache_key::derive(url);
        assert!(cache.path().join(&key).is_dir());
        assert_eq!(index.lookup(url), Some(key.as_str()));

        let second = populate_one(&reference, cache.path(), &git, &mut index).unwrap();
        assert_eq!(second, MirrorAction::Fetched);
        assert_eq!(index.lookup(url), Some(key.as_str()));

        // Exactly one clone across both runs, and the clone used the local
        // path as its source.
        let clones: Vec<_> = git
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GitCall::CloneMirror { .. }))
            .collect();
        assert_eq!(clones.len(), 1);
        assert!(matches!(
            &clones[0],
            GitCall::CloneMirror { source, .. } if *source == reference
        ));
    }

    #[test]
    fn test_origin_is_reset_to_canonical_url() {
        let cache = tempfile::tempdir().unwrap();
        let repos = tempfile::tempdir().unwrap();
        let repo = make_working_copy(repos.path(), "myrepo");

        let url = "https://example.com/repo.git";
        let git = FakeGit::new().with_origin(&repo, url);
        let mut index = MemoryIndex::new();

        populate_one(&repo.to_string_lossy(), cache.path(), &git, &mut index).unwrap();

        let mirror = cache.path().join(cache_key::derive(url));
        assert!(git.calls().iter().any(|c| matches!(
            c,
            GitCall::RemoteSetUrl { repo, remote, url: set }
                if *repo == mirror && remote == "origin" && set == url
        )));
    }

    #[test]
    fn test_url_reference_is_used_verbatim() {
        let cache = tempfile::tempdir().unwrap();
        let url = "https://example.com/repo.git";

        let git = FakeGit::new();
        let mut index = MemoryIndex::new();

        let action = populate_one(url, cache.path(), &git, &mut index).unwrap();
        assert_eq!(action, MirrorAction::Cloned);
        assert_eq!(index.lookup(url), Some(cache_key::derive(url).as_str()));
        assert!(matches!(
            &git.calls()[0],
            GitCall::CloneMirror { source, .. } if source == url
        ));
    }

    #[test]
    fn test_missing_origin_skips_without_cache_entry() {
        let cache = tempfile::tempdir().unwrap();
        let repos = tempfile::tempdir().unwrap();
        let repo = make_working_copy(repos.path(), "no-origin");

        let git = FakeGit::new();
        let mut index = MemoryIndex::new();

        let err = populate_one(&repo.to_string_lossy(), cache.path(), &git, &mut index)
            .unwrap_err();
        assert!(matches!(err, GmcError::NoRemote { .. }));
        assert!(index.is_empty());
        assert!(!git.calls().iter().any(|c| matches!(c, GitCall::CloneMirror { .. })));
    }

    #[test]
    fn test_failures_do_not_abort_later_references() {
        let cache = tempfile::tempdir().unwrap();
        let repos = tempfile::tempdir().unwrap();
        let no_origin = make_working_copy(repos.path(), "no-origin");
        let good = make_working_copy(repos.path(), "good");

        let url = "https://example.com/good.git";
        let git = FakeGit::new().with_origin(&good, url);
        let mut index = MemoryIndex::new();

        let refs = vec![
            "/does/not/exist".to_string(),
            repos.path().to_string_lossy().into_owned(),
            no_origin.to_string_lossy().into_owned(),
            good.to_string_lossy().into_owned(),
        ];
        let outcomes = populate_all(&refs, cache.path(), &git, &mut index);

        assert_eq!(outcomes.len(), 4);
        assert!(matches!(
            outcomes[0].result,
            Err(GmcError::PathNotFound { .. })
        ));
        assert!(matches!(
            outcomes[1].result,
            Err(GmcError::NotAWorkingCopy { .. })
        ));
        assert!(matches!(outcomes[2].result, Err(GmcError::NoRemote { .. })));
        assert!(outcomes[3].is_ok());
        assert_eq!(index.lookup(url), Some(cache_key::derive(url).as_str()));
    }

    #[test]
    fn test_failed_clone_reports_failure_but_still_records_index() {
        let cache = tempfile::tempdir().unwrap();
        let url = "https://example.com/repo.git";

        let git = FakeGit::new().failing_clone();
        let mut index = MemoryIndex::new();

        let err = populate_one(url, cache.path(), &git, &mut index).unwrap_err();
        assert!(matches!(err, GmcError::GitCommand { .. }));
        // Index update and origin fix-up are still attempted, best-effort.
        assert_eq!(index.lookup(url), Some(cache_key::derive(url).as_str()));
        assert!(git
            .calls()
            .iter()
            .any(|c| matches!(c, GitCall::RemoteSetUrl { .. })));
    }

    #[test]
    fn test_failed_fetch_reports_failure() {
        let cache = tempfile::tempdir().unwrap();
        let url = "https://example.com/repo.git";
        std::fs::create_dir_all(cache.path().join(cache_key::derive(url))).unwrap();

        let git = FakeGit::new().failing_fetch();
        let mut index = MemoryIndex::new();

        let err = populate_one(url, cache.path(), &git, &mut index).unwrap_err();
        assert!(matches!(err, GmcError::GitCommand { .. }));
        assert_eq!(index.lookup(url), Some(cache_key::derive(url).as_str()));
    }
}
