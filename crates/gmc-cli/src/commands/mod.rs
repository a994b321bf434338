pub mod discover;
pub mod populate;

use clap::Subcommand;

use gmc_core::config::CacheConfig;
use gmc_core::sink::OutputSink;

#[derive(Subcommand)]
pub enum Command {
    /// Create or refresh mirror cache entries for explicit repos/URLs
    Populate(populate::PopulateArgs),
    /// Find git working copies under a directory and populate each one
    Discover(discover::DiscoverArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    let cache_root = CacheConfig::cache_root()?;
    CacheConfig::ensure_root(&cache_root).map_err(|e| {
        anyhow::anyhow!("cannot create cache root {}: {e}", cache_root.display())
    })?;

    let log_name = match &cmd {
        Command::Populate(_) => "populate",
        Command::Discover(_) => "discover",
    };
    let sink = match OutputSink::with_log_file(&CacheConfig::log_path(&cache_root, log_name)) {
        Ok(sink) => sink,
        Err(e) => {
            // Console output must survive an unwritable log file.
            eprintln!("warning: cannot open log file: {e}");
            OutputSink::console_only()
        }
    };

    let writer_sink = sink.clone();
    tracing_subscriber::fmt()
        .with_writer(move || writer_sink.stderr_writer())
        .init();

    match cmd {
        Command::Populate(args) => populate::run(args, &cache_root, sink),
        Command::Discover(args) => discover::run(args, &cache_root, sink),
    }
}
