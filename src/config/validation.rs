use url::Url;

use crate::error::{LyricbarError, Result};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a URL string usable as a base for page paths
    pub fn validate_url(url: &str, field_name: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| {
            LyricbarError::Validation(format!("Invalid {} URL '{}': {}", field_name, url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(LyricbarError::Validation(format!(
                "{} URL cannot carry a path: {}",
                field_name, url
            )));
        }
        Ok(())
    }

    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(LyricbarError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field_name, min, max, value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("https://www.azlyrics.com", "site").is_ok());
        assert!(ConfigValidator::validate_url("http://localhost:8080/mirror/", "site").is_ok());
        assert!(ConfigValidator::validate_url("azlyrics", "site").is_err());
        assert!(ConfigValidator::validate_url("mailto:someone@example.com", "site").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(ConfigValidator::validate_range(10u64, 1, 300, "timeout").is_ok());
        assert!(ConfigValidator::validate_range(1u64, 1, 300, "timeout").is_ok());
        assert!(ConfigValidator::validate_range(0u64, 1, 300, "timeout").is_err());

        let err = ConfigValidator::validate_range(500u64, 1, 300, "timeout").unwrap_err();
        assert!(err.to_string().contains("timeout must be between 1 and 300"));
    }
}
