use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

use lyricbar::config::Config as AppConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

pub async fn execute(args: ConfigArgs, config: &AppConfig, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            println!("Current configuration:");
            println!("  cache_dir: {}", config.cache_root()?.display());
            println!("  custom_command: {:?}", config.custom_command);
            println!("  lyrics_site: {}", config.lyrics_site);
            println!("  extractor: {:?}", config.extractor);
            println!("  fetch_timeout_secs: {}", config.fetch_timeout_secs);
            println!("  max_document_bytes: {}", config.max_document_bytes);
            println!("  script_timeout_secs: {}", config.script_timeout_secs);
            println!("  user_agent: {}", config.user_agent);
        }

        ConfigCommands::Path => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => AppConfig::default_config_path()?,
            };
            println!("{}", path.display());
        }
    }

    Ok(())
}
