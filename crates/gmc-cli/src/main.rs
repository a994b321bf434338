mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "gmc", version, about = "Local mirror cache for git clones")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run(cli.command)
}
