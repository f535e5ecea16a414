//! Interfaces to the host player
//!
//! The host owns tracks, the current listing and the lyrics panel. This crate
//! only reads track metadata (under [`MetadataLock`]) and pushes display
//! updates through a [`LyricsSink`].

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// A playable item managed by the host.
pub trait Track: Send + Sync {
    fn find_meta(&self, key: &str) -> Option<String>;

    fn is_selected(&self) -> bool {
        false
    }
}

/// The listing currently shown by the host.
pub trait Playlist {
    fn tracks(&self) -> Vec<Arc<dyn Track>>;
}

/// Receives display updates for the lyrics panel.
pub trait LyricsSink: Send + Sync {
    fn set_lyrics(&self, track: &dyn Track, text: &str);
}

/// Guards metadata reads against concurrent mutation by the host.
///
/// Held only for the duration of a read; never across an `.await`.
#[derive(Debug, Default)]
pub struct MetadataLock {
    inner: Mutex<()>,
}

impl MetadataLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether some reader currently holds the lock.
    pub fn is_locked(&self) -> bool {
        matches!(self.inner.try_lock(), Err(TryLockError::WouldBlock))
    }
}

/// A track paired with the lock that guards its metadata.
#[derive(Clone, Copy)]
pub struct LockedTrack<'a> {
    track: &'a dyn Track,
    lock: &'a MetadataLock,
}

impl<'a> LockedTrack<'a> {
    pub fn new(track: &'a dyn Track, lock: &'a MetadataLock) -> Self {
        Self { track, lock }
    }

    pub fn track(&self) -> &'a dyn Track {
        self.track
    }

    /// Reads a single metadata field.
    pub fn meta(&self, key: &str) -> Option<String> {
        self.with(|track| track.find_meta(key))
    }

    /// Runs several reads under one lock scope.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Track) -> R) -> R {
        let _guard = self.lock.scope();
        f(self.track)
    }

    /// Artist and title, both required.
    pub fn artist_title(&self) -> Option<(String, String)> {
        self.with(|track| Some((track.find_meta("artist")?, track.find_meta("title")?)))
    }
}

/// Track backed by an in-memory metadata map.
#[derive(Debug, Clone, Default)]
pub struct MetaTrack {
    meta: HashMap<String, String>,
    selected: bool,
}

impl MetaTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Track for MetaTrack {
    fn find_meta(&self, key: &str) -> Option<String> {
        self.meta.get(key).cloned()
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[derive(Default)]
pub struct MemoryPlaylist {
    tracks: Vec<Arc<dyn Track>>,
}

impl MemoryPlaylist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: impl Track + 'static) {
        self.tracks.push(Arc::new(track));
    }
}

impl Playlist for MemoryPlaylist {
    fn tracks(&self) -> Vec<Arc<dyn Track>> {
        self.tracks.clone()
    }
}

/// Keeps every update it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.updates().pop()
    }
}

impl LyricsSink for RecordingSink {
    fn set_lyrics(&self, _track: &dyn Track, text: &str) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(text.to_string());
        }
    }
}

/// Writes placeholders to stderr and anything else to stdout.
pub struct StdoutSink {
    placeholders: Vec<&'static str>,
}

impl StdoutSink {
    pub fn new(placeholders: &[&'static str]) -> Self {
        Self {
            placeholders: placeholders.to_vec(),
        }
    }
}

impl LyricsSink for StdoutSink {
    fn set_lyrics(&self, _track: &dyn Track, text: &str) {
        if self.placeholders.contains(&text) {
            eprintln!("{}", text);
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}
