use std::path::Path;

use clap::Args;

use gmc_core::config::CacheConfig;
use gmc_core::sink::OutputSink;
use gmc_git::SystemGit;
use gmc_index::JsonIndex;
use gmc_populate::engine;

#[derive(Args)]
pub struct PopulateArgs {
    /// Local working-copy paths and/or repository URLs
    refs: Vec<String>,
}

pub fn run(args: PopulateArgs, cache_root: &Path, sink: OutputSink) -> anyhow::Result<()> {
    if args.refs.is_empty() {
        anyhow::bail!("usage: gmc populate /path/to/repo... [https://url ...]");
    }

    let git = SystemGit::locate(sink)?;
    let mut index = JsonIndex::load(&CacheConfig::index_path(cache_root));

    let outcomes = engine::populate_all(&args.refs, cache_root, &git, &mut index);

    // Per-reference failures are already logged; they do not change the
    // exit code once a non-empty reference list was processed.
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    println!("Done: {} cached | {failed} failed", outcomes.len() - failed);

    Ok(())
}
