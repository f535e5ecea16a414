use std::env;
use std::path::PathBuf;

use crate::core::extract::ExtractorKind;
use crate::error::{LyricbarError, Result};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    pub const CACHE_DIR: &'static str = "LYRICBAR_CACHE_DIR";
    pub const CUSTOM_COMMAND: &'static str = "LYRICBAR_CUSTOM_COMMAND";
    pub const LYRICS_SITE: &'static str = "LYRICBAR_LYRICS_SITE";
    pub const EXTRACTOR: &'static str = "LYRICBAR_EXTRACTOR";
    pub const FETCH_TIMEOUT_SECS: &'static str = "LYRICBAR_FETCH_TIMEOUT_SECS";
    pub const MAX_DOCUMENT_BYTES: &'static str = "LYRICBAR_MAX_DOCUMENT_BYTES";
    pub const SCRIPT_TIMEOUT_SECS: &'static str = "LYRICBAR_SCRIPT_TIMEOUT_SECS";
}

/// Environment variable parsing; unset or blank variables are `None`.
pub struct EnvParser;

impl EnvParser {
    pub fn parse_string(var_name: &str) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => Ok(Self::non_blank(&value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(LyricbarError::Validation(format!(
                "Environment variable {} contains invalid UTF-8",
                var_name
            ))),
        }
    }

    pub fn parse_path(var_name: &str) -> Result<Option<PathBuf>> {
        Ok(Self::parse_string(var_name)?.map(PathBuf::from))
    }

    pub fn parse_u64(var_name: &str) -> Result<Option<u64>> {
        Self::parse_string(var_name)?
            .map(|value| {
                value.parse::<u64>().map_err(|_| {
                    LyricbarError::Validation(format!(
                        "Invalid number in {}: '{}'. Must be a positive integer",
                        var_name, value
                    ))
                })
            })
            .transpose()
    }

    pub fn parse_extractor(var_name: &str) -> Result<Option<ExtractorKind>> {
        Self::parse_string(var_name)?
            .map(|value| {
                ExtractorKind::parse(&value).ok_or_else(|| {
                    LyricbarError::Validation(format!(
                        "Invalid extractor in {}: '{}'. Use: regex, dom",
                        var_name, value
                    ))
                })
            })
            .transpose()
    }

    fn non_blank(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable so they can run in parallel.

    #[test]
    fn test_unset_variable() {
        assert_eq!(EnvParser::parse_string("LYRICBAR_TEST_UNSET_VAR").unwrap(), None);
    }

    #[test]
    fn test_blank_variable() {
        env::set_var("LYRICBAR_TEST_BLANK", "   ");
        assert_eq!(EnvParser::parse_string("LYRICBAR_TEST_BLANK").unwrap(), None);
    }

    #[test]
    fn test_parse_u64() {
        env::set_var("LYRICBAR_TEST_U64", " 42 ");
        assert_eq!(EnvParser::parse_u64("LYRICBAR_TEST_U64").unwrap(), Some(42));

        env::set_var("LYRICBAR_TEST_U64_BAD", "ten");
        assert!(EnvParser::parse_u64("LYRICBAR_TEST_U64_BAD").is_err());
    }

    #[test]
    fn test_parse_extractor() {
        env::set_var("LYRICBAR_TEST_EXTRACTOR", "DOM");
        assert_eq!(
            EnvParser::parse_extractor("LYRICBAR_TEST_EXTRACTOR").unwrap(),
            Some(ExtractorKind::Dom)
        );

        env::set_var("LYRICBAR_TEST_EXTRACTOR_BAD", "xpath");
        assert!(EnvParser::parse_extractor("LYRICBAR_TEST_EXTRACTOR_BAD").is_err());
    }
}
