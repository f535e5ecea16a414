//! Core functionality modules
//!
//! - `text`: key normalization and cache file naming
//! - `cache`: on-disk lyrics cache and its maintenance
//! - `fetch`: size-capped HTTP document fetching
//! - `extract`: pulling the lyrics block out of a page
//! - `providers`: fallback lyrics sources and the chain that runs them
//! - `resolver`: the per-track lookup sequence
//! - `host`: collaborator interfaces (tracks, playlists, display)
//! - `files`: tracks backed by audio files

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod files;
pub mod host;
pub mod providers;
pub mod resolver;
pub mod text;

// Re-export commonly used types for convenience
pub use cache::DiskCache;
pub use extract::{ExtractorKind, LyricsExtractor};
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use files::FileTrack;
pub use host::{LockedTrack, LyricsSink, MetadataLock, Playlist, Track};
pub use providers::{LyricsProvider, ProviderChain};
pub use resolver::{LyricsSource, Resolution, Resolver};
