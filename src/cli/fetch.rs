use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use lyricbar::config::Config;
use lyricbar::core::host::{MetaTrack, MetadataLock, StdoutSink, Track};
use lyricbar::core::resolver::{Resolver, LOADING_PLACEHOLDER, NOT_FOUND_PLACEHOLDER};

#[derive(Args)]
pub struct FetchArgs {
    /// Path to the media file
    #[arg(value_name = "FILE_PATH", required_unless_present = "artist", conflicts_with_all = ["artist", "title"])]
    file_path: Option<PathBuf>,

    /// Artist name (used instead of a file)
    #[arg(long, requires = "title")]
    artist: Option<String>,

    /// Track title (used instead of a file)
    #[arg(long, requires = "artist")]
    title: Option<String>,

    /// Embedded lyrics to treat as the track's own tag
    #[arg(long, requires = "artist")]
    lyrics: Option<String>,
}

pub async fn execute(args: FetchArgs, config: &Config) -> Result<()> {
    let track: Box<dyn Track> = match (&args.file_path, &args.artist, &args.title) {
        (Some(path), _, _) => Box::new(super::open_track(path)?),
        (None, Some(artist), Some(title)) => {
            let mut track = MetaTrack::new()
                .with_meta("artist", artist.as_str())
                .with_meta("title", title.as_str());
            if let Some(lyrics) = &args.lyrics {
                track = track.with_meta("lyrics", lyrics.as_str());
            }
            Box::new(track)
        }
        _ => anyhow::bail!("Give a file or both --artist and --title"),
    };

    let resolver = Resolver::from_config(config, Arc::new(MetadataLock::new()))?;
    let sink = StdoutSink::new(&[LOADING_PLACEHOLDER, NOT_FOUND_PLACEHOLDER]);

    info!("Looking up lyrics...");
    let resolution = resolver.update_lyrics(track.as_ref(), &sink).await;
    debug!("Resolved via {:?}", resolution.source);

    if !resolution.is_found() {
        std::process::exit(1);
    }
    Ok(())
}
