use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod env;
pub mod validation;

use crate::core::extract::ExtractorKind;
use crate::core::fetch::{DEFAULT_MAX_DOCUMENT_BYTES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::core::providers::script::DEFAULT_SCRIPT_TIMEOUT_SECS;
use crate::core::providers::web::DEFAULT_LYRICS_SITE;
use crate::error::{ConfigError, Result};
use env::{EnvParser, EnvVars};
use validation::ConfigValidator;

const APP_NAME: &str = "lyricbar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lyrics cache directory; derived from the user cache directory when unset
    pub cache_dir: Option<PathBuf>,

    /// Command template for the script provider (empty disables it)
    pub custom_command: String,

    /// Base URL of the lyrics site
    pub lyrics_site: String,

    /// Strategy used to pull lyrics out of a page
    pub extractor: ExtractorKind,

    /// Request timeout for lyrics pages (seconds)
    pub fetch_timeout_secs: u64,

    /// Largest page accepted from the lyrics site (bytes)
    pub max_document_bytes: usize,

    /// Script provider timeout (seconds)
    pub script_timeout_secs: u64,

    /// User-Agent sent to the lyrics site
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            custom_command: String::new(),
            lyrics_site: DEFAULT_LYRICS_SITE.to_string(),
            extractor: ExtractorKind::default(),
            fetch_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            script_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()?,
        };

        let mut config = if config_file.exists() {
            let content = fs::read_to_string(&config_file)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.load_from_env()?;
        config.validate()?;

        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            if let Err(e) = config.save(&config_file) {
                warn!("Could not write default config to {}: {}", config_file.display(), e);
            } else {
                debug!("Wrote default config to {}", config_file.display());
            }
        }

        Ok(config)
    }

    fn load_from_env(&mut self) -> Result<()> {
        if let Some(path) = EnvParser::parse_path(EnvVars::CACHE_DIR)? {
            self.cache_dir = Some(path);
        }
        if let Some(command) = EnvParser::parse_string(EnvVars::CUSTOM_COMMAND)? {
            self.custom_command = command;
        }
        if let Some(site) = EnvParser::parse_string(EnvVars::LYRICS_SITE)? {
            self.lyrics_site = site;
        }
        if let Some(extractor) = EnvParser::parse_extractor(EnvVars::EXTRACTOR)? {
            self.extractor = extractor;
        }
        if let Some(secs) = EnvParser::parse_u64(EnvVars::FETCH_TIMEOUT_SECS)? {
            self.fetch_timeout_secs = secs;
        }
        if let Some(bytes) = EnvParser::parse_u64(EnvVars::MAX_DOCUMENT_BYTES)? {
            self.max_document_bytes = bytes as usize;
        }
        if let Some(secs) = EnvParser::parse_u64(EnvVars::SCRIPT_TIMEOUT_SECS)? {
            self.script_timeout_secs = secs;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.lyrics_site, "lyrics_site")?;
        ConfigValidator::validate_range(self.fetch_timeout_secs, 1, 300, "fetch_timeout_secs")?;
        ConfigValidator::validate_range(
            self.max_document_bytes,
            1024,
            64 << 20,
            "max_document_bytes",
        )?;
        ConfigValidator::validate_range(self.script_timeout_secs, 1, 3600, "script_timeout_secs")?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The lyrics cache directory, resolved once at start-up.
    ///
    /// Falls back to `<user cache dir>/lyricbar/lyrics`, which on Linux is
    /// `$XDG_CACHE_HOME` or `$HOME/.cache`.
    pub fn cache_root(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let base = BaseDirs::new().ok_or(ConfigError::NoProjectDirs)?;
        Ok(base.cache_dir().join(APP_NAME).join("lyrics"))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from("net", APP_NAME, APP_NAME).ok_or(ConfigError::NoProjectDirs)?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
