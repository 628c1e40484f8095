use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Required fields are present (enforced by serde)
/// - URL is http(s)
/// - At least one non-blank tag
/// - Cache expiry is not negative and the HTTP timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError("QB_URL cannot be empty".to_string()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "QB_URL must start with http:// or https://, got {}",
            url
        )));
    }

    if config.tags.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one tag must be configured".to_string(),
        ));
    }
    if config.tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "tags cannot be blank".to_string(),
        ));
    }

    if config.cache_expiry_days < 0 {
        return Err(ConfigError::ValidationError(
            "CACHE_EXPIRY_DAYS cannot be negative".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
