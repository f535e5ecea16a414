//! Lyrics lookup for the currently playing track.
//!
//! Lyrics come from the track's own tags, then a per-song disk cache, then
//! a chain of providers (a user command, then a lyrics web site). Whatever a
//! provider finds is cached before it is shown.

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{LyricbarError, Result};
