use serde::Deserialize;

/// Largest accepted `MAX_EXPIRY_DAYS` (about 100 years)
pub const EXPIRY_DAYS_CEILING: i64 = 36_500;

/// URL shortening configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UrlConfig {
    /// Base URL for constructing short URLs (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Length of randomly generated short codes
    pub short_code_length: usize,

    /// Maximum number of candidates drawn before giving up on a free short code
    pub short_code_max_attempts: u32,

    /// Expiry applied when a create request does not name one (in days)
    pub default_expiry_days: i64,

    /// Upper bound on the expiry a caller may request (in days)
    pub max_expiry_days: i64,

    /// Whether normalized URLs must parse as absolute URLs
    pub strict_url_validation: bool,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            short_code_length: 7,
            short_code_max_attempts: 1000,
            default_expiry_days: 7,
            max_expiry_days: 365,
            strict_url_validation: true,
        }
    }
}

impl UrlConfig {
    /// Validate URL configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() || self.base_url.ends_with('/') {
            return Err("BASE_URL must be non-empty and must not end with '/'".to_string());
        }

        if self.short_code_length < 4 || self.short_code_length > 16 {
            return Err("SHORT_CODE_LENGTH must be between 4 and 16".to_string());
        }

        if self.short_code_max_attempts < 1 || self.short_code_max_attempts > 100_000 {
            return Err("SHORT_CODE_MAX_ATTEMPTS must be between 1 and 100000".to_string());
        }

        if self.max_expiry_days < 1 || self.max_expiry_days > EXPIRY_DAYS_CEILING {
            return Err(format!(
                "MAX_EXPIRY_DAYS must be between 1 and {}",
                EXPIRY_DAYS_CEILING
            ));
        }

        if self.default_expiry_days < 1 || self.default_expiry_days > self.max_expiry_days {
            return Err("DEFAULT_EXPIRY_DAYS must be between 1 and MAX_EXPIRY_DAYS".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(UrlConfig::default().validate().is_ok());
    }

    #[test]
    fn expiry_bound_is_capped() {
        let at_ceiling = UrlConfig {
            max_expiry_days: EXPIRY_DAYS_CEILING,
            ..UrlConfig::default()
        };
        assert!(at_ceiling.validate().is_ok());

        let beyond = UrlConfig {
            max_expiry_days: 200_000_000,
            ..UrlConfig::default()
        };
        assert!(beyond.validate().is_err());
    }
}
