use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::cache::DiskCache;
use crate::core::fetch::HttpFetcher;
use crate::core::host::{LockedTrack, LyricsSink, MetadataLock, Playlist, Track};
use crate::core::providers::{ProviderChain, ScriptProvider, WebProvider};
use crate::error::Result;

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const NOT_FOUND_PLACEHOLDER: &str = "Lyrics not found";

/// Tag keys that may carry embedded lyrics, in order of preference.
pub const LYRICS_META_KEYS: [&str; 3] = ["unsynced lyrics", "UNSYNCEDLYRICS", "lyrics"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsSource {
    Metadata,
    Cache,
    Provider(&'static str),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub source: LyricsSource,
    pub lyrics: Option<String>,
}

impl Resolution {
    fn found(source: LyricsSource, lyrics: String) -> Self {
        Self {
            source,
            lyrics: Some(lyrics),
        }
    }

    fn not_found() -> Self {
        Self {
            source: LyricsSource::NotFound,
            lyrics: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.lyrics.is_some()
    }
}

/// Resolves lyrics for a track: tags, then cache, then the provider chain.
///
/// One call runs to completion; nothing here spawns or cancels work.
pub struct Resolver {
    cache: DiskCache,
    providers: ProviderChain,
    lock: Arc<MetadataLock>,
}

impl Resolver {
    pub fn new(cache: DiskCache, providers: ProviderChain, lock: Arc<MetadataLock>) -> Self {
        Self {
            cache,
            providers,
            lock,
        }
    }

    /// Script provider first, then the web lookup.
    pub fn from_config(config: &Config, lock: Arc<MetadataLock>) -> Result<Self> {
        let cache = DiskCache::new(config.cache_root()?);
        if let Err(e) = cache.ensure_dir() {
            warn!(
                "Cache directory {} unavailable (os error {:?})",
                cache.cache_dir().display(),
                e.raw_os_error()
            );
        }

        let fetcher = HttpFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_document_bytes,
        )?;
        let providers = ProviderChain::new()
            .with(ScriptProvider::new(
                config.custom_command.clone(),
                Duration::from_secs(config.script_timeout_secs),
            ))
            .with(WebProvider::new(
                &config.lyrics_site,
                Arc::new(fetcher),
                config.extractor.build(),
            )?);

        debug!("Lyrics providers: {:?}", providers.names());
        Ok(Self::new(cache, providers, lock))
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    pub fn lock(&self) -> &Arc<MetadataLock> {
        &self.lock
    }

    pub async fn update_lyrics(&self, track: &dyn Track, sink: &dyn LyricsSink) -> Resolution {
        let locked = LockedTrack::new(track, &self.lock);

        if let Some(lyrics) = lyrics_from_metadata(&locked) {
            debug!("Using lyrics from track metadata");
            sink.set_lyrics(track, &lyrics);
            return Resolution::found(LyricsSource::Metadata, lyrics);
        }

        let Some((artist, title)) = locked.artist_title() else {
            warn!("Track is missing artist or title; cannot look up lyrics");
            sink.set_lyrics(track, NOT_FOUND_PLACEHOLDER);
            return Resolution::not_found();
        };

        if let Some(lyrics) = self.cache.load(&artist, &title) {
            debug!("Using cached lyrics for: {} - {}", artist, title);
            sink.set_lyrics(track, &lyrics);
            return Resolution::found(LyricsSource::Cache, lyrics);
        }

        sink.set_lyrics(track, LOADING_PLACEHOLDER);

        if let Some((provider, lyrics)) = self.providers.resolve(&locked).await {
            self.persist(&artist, &title, &lyrics);
            sink.set_lyrics(track, &lyrics);
            return Resolution::found(LyricsSource::Provider(provider), lyrics);
        }

        info!("No lyrics found for: {} - {}", artist, title);
        sink.set_lyrics(track, NOT_FOUND_PLACEHOLDER);
        Resolution::not_found()
    }

    /// Evicts cache entries for the selected tracks of `playlist`.
    pub fn remove_selected_from_cache(&self, playlist: &dyn Playlist) -> usize {
        self.cache.remove_selected(playlist, &self.lock)
    }

    fn persist(&self, artist: &str, title: &str, lyrics: &str) {
        if let Err(e) = self.cache.ensure_dir() {
            warn!("Cannot create cache directory: {}", e);
        }
        if !self.cache.save(artist, title, lyrics) {
            warn!("Lyrics for {} - {} were not cached", artist, title);
        }
    }
}

fn lyrics_from_metadata(track: &LockedTrack<'_>) -> Option<String> {
    track.with(|track| LYRICS_META_KEYS.iter().find_map(|key| track.find_meta(key)))
}
