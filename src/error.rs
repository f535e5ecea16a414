//! Error handling for lyricbar
//!
//! Absence of lyrics is never an error: every stage that may legitimately come
//! up empty returns `Option`. The types here cover the conditions that are
//! worth telling apart in logs (transport, process, configuration) and the one
//! fatal fetch condition, an oversized response.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LyricbarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Project directories unavailable")]
    NoProjectDirs,
}

/// Failure modes of a single document fetch.
///
/// Only [`FetchError::TooLarge`] is fatal for the attempt; transport failures
/// and non-2xx statuses are reported by the fetcher as absence.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("file '{url}' too large (limit {limit} bytes)")]
    TooLarge { url: String, limit: usize },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::TooLarge { .. })
    }
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("No script command configured")]
    EmptyTemplate,

    #[error("Invalid script command: {0}")]
    Template(#[from] Box<handlebars::RenderError>),

    #[error("Failed to spawn script: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Script timed out after {0}s")]
    Timeout(u64),

    #[error("Script exited with status {0:?}")]
    ExitStatus(Option<i32>),

    #[error("Script output is not valid UTF-8")]
    InvalidUtf8,
}

impl From<handlebars::TemplateError> for LyricbarError {
    fn from(err: handlebars::TemplateError) -> Self {
        LyricbarError::Template(Box::new(err))
    }
}

impl From<handlebars::RenderError> for ScriptError {
    fn from(err: handlebars::RenderError) -> Self {
        ScriptError::Template(Box::new(err))
    }
}

impl From<toml::de::Error> for LyricbarError {
    fn from(err: toml::de::Error) -> Self {
        LyricbarError::Config(ConfigError::InvalidFormat(err))
    }
}

impl From<toml::ser::Error> for LyricbarError {
    fn from(err: toml::ser::Error) -> Self {
        LyricbarError::Config(ConfigError::Serialize(err))
    }
}

pub type Result<T> = std::result::Result<T, LyricbarError>;
