use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::*;
use lyricbar::config::Config;
use lyricbar::error::{LyricbarError, Result};
use lyricbar::utils;

#[derive(Parser)]
#[command(name = "lyricbar")]
#[command(about = "Look up lyrics for a track from its tags, a local cache, a custom command or the web")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print lyrics for a file or song
    Fetch(fetch::FetchArgs),

    /// Manage cached lyrics
    Cache(cache::CacheArgs),

    /// Show configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::init_logging(cli.verbose).map_err(LyricbarError::Internal)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => fetch::execute(args, &config)
            .await
            .map_err(LyricbarError::Internal),
        Commands::Cache(args) => cache::execute(args, &config)
            .await
            .map_err(LyricbarError::Internal),
        Commands::Config(args) => cli::config::execute(args, &config, cli.config.as_deref())
            .await
            .map_err(LyricbarError::Internal),
    }
}
