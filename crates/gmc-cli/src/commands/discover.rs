use std::path::{Path, PathBuf};

use clap::Args;

use gmc_core::config::CacheConfig;
use gmc_core::sink::OutputSink;
use gmc_git::SystemGit;
use gmc_index::JsonIndex;
use gmc_populate::engine;

#[derive(Args)]
pub struct DiscoverArgs {
    /// Directory to search for git working copies
    root: Option<PathBuf>,
}

pub fn run(args: DiscoverArgs, cache_root: &Path, sink: OutputSink) -> anyhow::Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => anyhow::bail!("usage: gmc discover /path/to/search"),
    };
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let config = CacheConfig::load(cache_root)?;

    tracing::info!("searching for git repos in {}", root.display());
    let repos = gmc_discover::scan_repos(&root, &config.scan_ignore);
    if repos.is_empty() {
        anyhow::bail!("no git repos found under {}", root.display());
    }
    tracing::info!("found {} repo(s), populating cache", repos.len());

    let git = SystemGit::locate(sink)?;
    let mut index = JsonIndex::load(&CacheConfig::index_path(cache_root));

    let refs: Vec<String> = repos
        .iter()
        .map(|r| r.to_string_lossy().into_owned())
        .collect();
    let outcomes = engine::populate_all(&refs, cache_root, &git, &mut index);

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    println!("Done: {} populated | {failed} failed", outcomes.len() - failed);

    Ok(())
}
