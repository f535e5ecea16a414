use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::host::{MetadataLock, Playlist};
use crate::core::text::cache_filename;

/// Plain-text lyrics cache, one file per `(artist, title)`.
///
/// Files hold the raw lyrics with no header. An entry exists as soon as its
/// file does, whatever the content.
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn path_for(&self, artist: &str, title: &str) -> PathBuf {
        cache_filename(&self.cache_dir, artist, title)
    }

    pub fn is_cached(&self, artist: Option<&str>, title: Option<&str>) -> bool {
        match (artist, title) {
            (Some(artist), Some(title)) => self.path_for(artist, title).exists(),
            _ => false,
        }
    }

    /// Creates the cache directory one segment at a time.
    ///
    /// Segments that already exist are fine; the first other failure is
    /// returned and nothing further is attempted.
    pub fn ensure_dir(&self) -> io::Result<()> {
        let mut segments: Vec<&Path> = self
            .cache_dir
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        segments.reverse();

        for segment in segments {
            match create_dir(segment) {
                Ok(()) => debug!("Created cache directory {}", segment.display()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => {
                    warn!("Failed to create {}: {}", segment.display(), e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn load(&self, artist: &str, title: &str) -> Option<String> {
        let path = self.path_for(artist, title);
        debug!("Cache lookup: {}", path.display());
        match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                debug!("Cache miss for {} - {}: {}", artist, title, e);
                None
            }
        }
    }

    /// Writes `lyrics` to the entry, truncating any previous content.
    ///
    /// Returns `false` only when the file cannot be opened.
    pub fn save(&self, artist: &str, title: &str, lyrics: &str) -> bool {
        let path = self.path_for(artist, title);
        let mut file = match fs::File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Could not open file for writing: {}: {}", path.display(), e);
                return false;
            }
        };

        if let Err(e) = file.write_all(lyrics.as_bytes()) {
            debug!("Incomplete cache write to {}: {}", path.display(), e);
        }
        debug!("Cached lyrics for: {} - {}", artist, title);
        true
    }

    pub fn remove(&self, artist: Option<&str>, title: Option<&str>) {
        let (Some(artist), Some(title)) = (artist, title) else {
            return;
        };
        if !self.is_cached(Some(artist), Some(title)) {
            return;
        }

        let path = self.path_for(artist, title);
        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed cache entry {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    /// Evicts the entries of every selected track in `playlist`.
    ///
    /// Metadata is read under `lock`; files are deleted after it is released.
    /// Returns how many entries were removed.
    pub fn remove_selected(&self, playlist: &dyn Playlist, lock: &MetadataLock) -> usize {
        let mut removed = 0;

        for (artist, title) in selected_keys(playlist, lock) {
            if self.is_cached(Some(&artist), Some(&title)) {
                self.remove(Some(&artist), Some(&title));
                removed += 1;
            }
        }

        info!("Removed {} cached lyrics entries", removed);
        removed
    }
}

/// Artist and title of each selected track that has both.
fn selected_keys(playlist: &dyn Playlist, lock: &MetadataLock) -> Vec<(String, String)> {
    let _guard = lock.scope();
    playlist
        .tracks()
        .iter()
        .filter(|track| track.is_selected())
        .filter_map(|track| Some((track.find_meta("artist")?, track.find_meta("title")?)))
        .collect()
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::DirBuilder::new().create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::{MemoryPlaylist, MetaTrack, Track};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn cache_in(tmp: &TempDir) -> DiskCache {
        DiskCache::new(tmp.path().join("lyricbar").join("lyrics"))
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);

        cache.ensure_dir().unwrap();
        assert!(cache.cache_dir().is_dir());
        cache.ensure_dir().unwrap();
    }

    #[test]
    fn test_ensure_dir_reports_failure() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let cache = DiskCache::new(blocker.join("lyrics"));
        assert!(cache.ensure_dir().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();

        let lyrics = "Is this the real life?\nIs this just fantasy?\n";
        assert!(cache.save("Queen", "Bohemian Rhapsody", lyrics));
        assert_eq!(cache.load("Queen", "Bohemian Rhapsody").as_deref(), Some(lyrics));
        assert!(cache.is_cached(Some("Queen"), Some("Bohemian Rhapsody")));
    }

    #[test]
    fn test_save_truncates() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();

        cache.save("A", "B", "a much longer first version\n");
        cache.save("A", "B", "short\n");
        assert_eq!(cache.load("A", "B").as_deref(), Some("short\n"));
    }

    #[test]
    fn test_slashes_in_key() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();

        assert!(cache.save("AC/DC", "T.N.T.", "oi\n"));
        assert!(cache.cache_dir().join("AC_DC-T.N.T.").is_file());
        assert_eq!(cache.load("AC/DC", "T.N.T.").as_deref(), Some("oi\n"));
    }

    #[test]
    fn test_save_without_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        assert!(!cache.save("A", "B", "text"));
    }

    #[test]
    fn test_missing_entry() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        assert_eq!(cache.load("Nobody", "Nothing"), None);
        assert!(!cache.is_cached(Some("Nobody"), Some("Nothing")));
        assert!(!cache.is_cached(None, Some("Nothing")));
    }

    #[test]
    fn test_empty_file_counts_as_cached() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();
        fs::write(cache.path_for("A", "B"), "").unwrap();

        assert!(cache.is_cached(Some("A"), Some("B")));
        assert_eq!(cache.load("A", "B").as_deref(), Some(""));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.remove(Some("A"), Some("B"));
        cache.remove(None, None);
    }

    #[test]
    fn test_remove_selected_leaves_others() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();
        cache.save("Queen", "Innuendo", "one\n");
        cache.save("Queen", "Mustapha", "two\n");
        cache.save("Unrelated", "Entry", "three\n");

        let mut playlist = MemoryPlaylist::new();
        playlist.push(
            MetaTrack::new()
                .with_meta("artist", "Queen")
                .with_meta("title", "Innuendo")
                .selected(true),
        );
        playlist.push(
            MetaTrack::new()
                .with_meta("artist", "Queen")
                .with_meta("title", "Mustapha"),
        );
        playlist.push(MetaTrack::new().with_meta("artist", "Queen").selected(true));

        let removed = cache.remove_selected(&playlist, &MetadataLock::new());

        assert_eq!(removed, 1);
        assert!(!cache.is_cached(Some("Queen"), Some("Innuendo")));
        assert!(cache.is_cached(Some("Queen"), Some("Mustapha")));
        assert!(cache.is_cached(Some("Unrelated"), Some("Entry")));
    }

    /// Remembers whether the metadata lock was held on every read.
    struct WatchedTrack {
        inner: MetaTrack,
        lock: Arc<MetadataLock>,
        reads: Arc<Mutex<Vec<bool>>>,
    }

    impl Track for WatchedTrack {
        fn find_meta(&self, key: &str) -> Option<String> {
            self.reads.lock().unwrap().push(self.lock.is_locked());
            self.inner.find_meta(key)
        }

        fn is_selected(&self) -> bool {
            self.inner.is_selected()
        }
    }

    #[test]
    fn test_selected_keys_read_under_lock_then_release() {
        let lock = Arc::new(MetadataLock::new());
        let reads = Arc::new(Mutex::new(Vec::new()));

        let mut playlist = MemoryPlaylist::new();
        playlist.push(WatchedTrack {
            inner: MetaTrack::new()
                .with_meta("artist", "Queen")
                .with_meta("title", "Innuendo")
                .selected(true),
            lock: Arc::clone(&lock),
            reads: Arc::clone(&reads),
        });
        playlist.push(WatchedTrack {
            inner: MetaTrack::new()
                .with_meta("artist", "Queen")
                .with_meta("title", "Headlong"),
            lock: Arc::clone(&lock),
            reads: Arc::clone(&reads),
        });

        let keys = selected_keys(&playlist, &lock);

        assert_eq!(keys, vec![("Queen".to_string(), "Innuendo".to_string())]);
        assert!(!lock.is_locked());
        let reads = reads.lock().unwrap();
        assert_eq!(reads.len(), 2);
        assert!(reads.iter().all(|&held| held));
    }

    #[test]
    fn test_remove_selected_releases_lock() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        cache.ensure_dir().unwrap();
        cache.save("Queen", "Innuendo", "one\n");

        let lock = MetadataLock::new();
        let mut playlist = MemoryPlaylist::new();
        playlist.push(
            MetaTrack::new()
                .with_meta("artist", "Queen")
                .with_meta("title", "Innuendo")
                .selected(true),
        );

        assert_eq!(cache.remove_selected(&playlist, &lock), 1);
        assert!(!lock.is_locked());
        assert!(!cache.path_for("Queen", "Innuendo").exists());
    }
}
