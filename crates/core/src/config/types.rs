use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::de;

/// Root configuration
///
/// Built once at startup and handed to each component by reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// qBittorrent Web UI base URL (e.g., "http://localhost:8080")
    pub url: String,
    #[serde(deserialize_with = "de::string")]
    pub username: String,
    #[serde(deserialize_with = "de::string")]
    pub password: String,
    /// Category of the original torrents. Kept for compatibility with older
    /// deployments; matching derives the category from each cross-seed.
    #[serde(deserialize_with = "de::string")]
    pub category_name: String,
    /// Tags that mark cross-seeded torrents, processed in order.
    #[serde(deserialize_with = "de::tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_cache_expiry_days")]
    pub cache_expiry_days: i64,
    #[serde(default, deserialize_with = "de::flag")]
    pub dry_run: bool,
    /// Minutes between cycles; zero or less runs a single cycle.
    #[serde(default = "default_schedule_minutes")]
    pub schedule_minutes: i64,
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_cache_expiry_days() -> i64 {
    14
}

fn default_schedule_minutes() -> i64 {
    30
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("torrent_cache.json")
}

fn default_timeout() -> u32 {
    30
}

impl Config {
    /// Whether the process should keep polling after the first cycle.
    pub fn is_scheduled(&self) -> bool {
        self.schedule_minutes > 0
    }
}

/// Sanitized config for logging (password redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub category_name: String,
    pub tags: Vec<String>,
    pub cache_expiry_days: i64,
    pub dry_run: bool,
    pub schedule_minutes: i64,
    pub cache_path: PathBuf,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username.clone(),
            password_configured: !config.password.is_empty(),
            category_name: config.category_name.clone(),
            tags: config.tags.clone(),
            cache_expiry_days: config.cache_expiry_days,
            dry_run: config.dry_run,
            schedule_minutes: config.schedule_minutes,
            cache_path: config.cache_path.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
url = "http://localhost:8080"
username = "admin"
password = "adminadmin"
category_name = "movies"
tags = ["cross-seed"]
"#;

    #[test]
    fn test_deserialize_minimal_uses_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.url, "http://localhost:8080");
        assert_eq!(config.tags, vec!["cross-seed".to_string()]);
        assert_eq!(config.cache_expiry_days, 14);
        assert!(!config.dry_run);
        assert_eq!(config.schedule_minutes, 30);
        assert_eq!(config.cache_path.to_str().unwrap(), "torrent_cache.json");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.is_scheduled());
    }

    #[test]
    fn test_deserialize_tags_from_json_string() {
        let toml = r#"
url = "http://localhost:8080"
username = "admin"
password = "adminadmin"
category_name = "movies"
tags = '["cross-seed", "xseed"]'
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tags, vec!["cross-seed".to_string(), "xseed".to_string()]);
    }

    #[test]
    fn test_deserialize_dry_run_string_flag() {
        let toml = format!("{}dry_run = \"T\"\nschedule_minutes = 0\n", MINIMAL);
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(config.dry_run);
        assert!(!config.is_scheduled());
    }

    #[test]
    fn test_deserialize_missing_password_fails() {
        let toml = r#"
url = "http://localhost:8080"
username = "admin"
category_name = "movies"
tags = ["cross-seed"]
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_password() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.password_configured);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("adminadmin"));
    }
}
