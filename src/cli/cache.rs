use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use lyricbar::config::Config;
use lyricbar::core::cache::DiskCache;
use lyricbar::core::host::{MemoryPlaylist, MetaTrack, MetadataLock};

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    command: CacheCommands,
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Remove cached lyrics for the given files or song
    Remove {
        /// Audio files whose cached lyrics should be removed
        #[arg(value_name = "FILE_PATH", required_unless_present = "artist", conflicts_with_all = ["artist", "title"])]
        files: Vec<PathBuf>,

        /// Artist name
        #[arg(long, requires = "title")]
        artist: Option<String>,

        /// Track title
        #[arg(long, requires = "artist")]
        title: Option<String>,
    },

    /// Show where lyrics for a song are cached
    Path {
        /// Artist name
        #[arg(long)]
        artist: String,

        /// Track title
        #[arg(long)]
        title: String,
    },
}

pub async fn execute(args: CacheArgs, config: &Config) -> Result<()> {
    let cache = DiskCache::new(config.cache_root()?);

    match args.command {
        CacheCommands::Remove {
            files,
            artist,
            title,
        } => {
            let mut playlist = MemoryPlaylist::new();
            if let (Some(artist), Some(title)) = (&artist, &title) {
                playlist.push(
                    MetaTrack::new()
                        .with_meta("artist", artist.as_str())
                        .with_meta("title", title.as_str())
                        .selected(true),
                );
            }
            for path in &files {
                match super::open_track(path) {
                    Ok(track) => playlist.push(track.selected(true)),
                    Err(e) => warn!("Skipping {}: {}", path.display(), e),
                }
            }

            let removed = cache.remove_selected(&playlist, &MetadataLock::new());
            info!("Cache directory: {}", cache.cache_dir().display());
            println!("Removed {} cached lyrics file(s)", removed);
        }

        CacheCommands::Path { artist, title } => {
            let path = cache.path_for(&artist, &title);
            let status = if path.exists() { "cached" } else { "not cached" };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}
