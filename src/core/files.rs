use lofty::error::LoftyError;
use lofty::file::TaggedFileExt;
use lofty::read_from_path;
use lofty::tag::{Accessor, ItemKey};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::host::Track;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Cannot parse the tag info from track: `{0}`. Error: `{1}`")]
    ParseFailed(String, LoftyError),
}

/// A track read from an audio file's tags.
///
/// Metadata is captured once when the file is opened; the lyrics item, if
/// any, is exposed under the `lyrics` key.
#[derive(Debug, Clone)]
pub struct FileTrack {
    path: PathBuf,
    meta: HashMap<String, String>,
    selected: bool,
}

impl FileTrack {
    pub fn from_path(path: &Path) -> Result<Self, TrackError> {
        let file_path = path.display().to_string();
        let tagged_file =
            read_from_path(path).map_err(|err| TrackError::ParseFailed(file_path.clone(), err))?;

        let mut meta = HashMap::new();
        meta.insert("path".to_string(), file_path.clone());

        match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            Some(tag) => {
                let mut put = |key: &str, value: Option<String>| {
                    if let Some(value) = value.filter(|v| !v.is_empty()) {
                        meta.insert(key.to_string(), value);
                    }
                };
                put("artist", tag.artist().map(|s| s.to_string()));
                put("title", tag.title().map(|s| s.to_string()));
                put("album", tag.album().map(|s| s.to_string()));
                put("genre", tag.genre().map(|s| s.to_string()));
                put("year", tag.year().map(|y| y.to_string()));
                put("track", tag.track().map(|n| n.to_string()));
                put(
                    "album_artist",
                    tag.get_string(&ItemKey::AlbumArtist).map(str::to_string),
                );
                put("lyrics", tag.get_string(&ItemKey::Lyrics).map(str::to_string));
            }
            None => warn!("No tag found in {}", file_path),
        }

        debug!("Read {} metadata fields from {}", meta.len(), file_path);
        Ok(Self {
            path: path.to_path_buf(),
            meta,
            selected: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Track for FileTrack {
    fn find_meta(&self, key: &str) -> Option<String> {
        self.meta.get(key).cloned()
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = FileTrack::from_path(&tmp.path().join("missing.mp3"));
        assert!(matches!(result, Err(TrackError::ParseFailed(..))));
    }

    /// A silent mono 16-bit PCM WAV file with no tags.
    fn silent_wav() -> Vec<u8> {
        let data_len: u32 = 1600;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // channels
        wav.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
        wav.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
        wav.extend_from_slice(&2u16.to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    fn write_tags(path: &Path) {
        use lofty::config::WriteOptions;
        use lofty::file::AudioFile;
        use lofty::tag::Tag;

        let mut tagged_file = read_from_path(path).unwrap();
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));

        let tag = tagged_file.tag_mut(tag_type).unwrap();
        tag.set_artist("Queen".to_string());
        tag.set_title("Innuendo".to_string());
        tag.set_album("Innuendo".to_string());
        tag.insert_text(
            ItemKey::Lyrics,
            "While the sun hangs in the sky\nAnd the desert has sand\n".to_string(),
        );

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .unwrap();
    }

    #[test]
    fn test_tags_become_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("innuendo.wav");
        std::fs::write(&path, silent_wav()).unwrap();
        write_tags(&path);

        let track = FileTrack::from_path(&path).unwrap();

        assert_eq!(track.path(), path.as_path());
        assert_eq!(track.find_meta("artist").as_deref(), Some("Queen"));
        assert_eq!(track.find_meta("title").as_deref(), Some("Innuendo"));
        assert_eq!(track.find_meta("album").as_deref(), Some("Innuendo"));
        assert_eq!(
            track.find_meta("lyrics").as_deref(),
            Some("While the sun hangs in the sky\nAnd the desert has sand\n")
        );
        assert_eq!(
            track.find_meta("path"),
            Some(path.display().to_string())
        );
        assert_eq!(track.find_meta("genre"), None);
        assert!(!track.is_selected());
        assert!(track.selected(true).is_selected());
    }

    #[test]
    fn test_untagged_file_has_only_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("silence.wav");
        std::fs::write(&path, silent_wav()).unwrap();

        let track = FileTrack::from_path(&path).unwrap();
        assert_eq!(track.find_meta("artist"), None);
        assert_eq!(track.find_meta("lyrics"), None);
        assert!(track.find_meta("path").is_some());
    }

    #[test]
    fn test_not_audio() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "definitely not audio").unwrap();
        assert!(FileTrack::from_path(&path).is_err());
    }
}
