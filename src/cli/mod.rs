//! Command Line Interface module
//!
//! - `fetch`: resolve and print lyrics for one track
//! - `cache`: cache maintenance (remove entries, show paths)
//! - `config`: show the effective configuration

pub mod cache;
pub mod config;
pub mod fetch;

use anyhow::Result;
use lyricbar::core::host::Track;
use lyricbar::core::FileTrack;
use std::path::Path;
use tracing::info;

/// Opens an audio file as a track, with a readable error for the CLI.
pub(crate) fn open_track(path: &Path) -> Result<FileTrack> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let track = FileTrack::from_path(path)?;
    info!(
        "Artist: {}, Title: {}",
        track.find_meta("artist").unwrap_or_else(|| "-".to_string()),
        track.find_meta("title").unwrap_or_else(|| "-".to_string())
    );
    Ok(track)
}
