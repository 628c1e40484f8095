use figment::{
    error::Kind,
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::collections::BTreeMap;
use std::path::Path;

use super::{types::Config, ConfigError};

/// Config file read when no explicit path is given. Absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "seedsync.toml";

/// Text settings, taken verbatim so values like `007` keep their exact form.
///
/// Later entries win: `TAGS` overrides `TAG_NAME`.
const TEXT_ENV_KEYS: &[(&str, &str)] = &[
    ("QB_URL", "url"),
    ("QB_USERNAME", "username"),
    ("QB_PASSWORD", "password"),
    ("CATEGORY_NAME", "category_name"),
    ("TAG_NAME", "tags"),
    ("TAGS", "tags"),
    ("CACHE_FILE", "cache_path"),
];

/// Numeric and flag settings, parsed by figment's env provider.
const VALUE_ENV_KEYS: &[(&str, &str)] = &[
    ("CACHE_EXPIRY_DAYS", "cache_expiry_days"),
    ("DRY_RUN", "dry_run"),
    ("SCHEDULE", "schedule_minutes"),
    ("QB_TIMEOUT_SECS", "timeout_secs"),
];

fn field_for_env_key(key: &str) -> Option<&'static str> {
    VALUE_ENV_KEYS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(key))
        .map(|(_, field)| *field)
}

fn env_key_for_field(field: &str) -> &str {
    TEXT_ENV_KEYS
        .iter()
        .chain(VALUE_ENV_KEYS)
        .find(|(_, f)| *f == field)
        .map(|(env, _)| *env)
        .unwrap_or(field)
}

/// Environment provider for the numeric and flag settings.
pub fn env_provider() -> Env {
    Env::raw().filter_map(|key| field_for_env_key(key.as_str()).map(Into::into))
}

/// Provider for the text settings, read from the environment as-is.
pub fn text_env_provider() -> Serialized<BTreeMap<&'static str, String>> {
    let mut values = BTreeMap::new();
    for (env, field) in TEXT_ENV_KEYS {
        if let Ok(value) = std::env::var(env) {
            values.insert(*field, value);
        }
    }
    Serialized::defaults(values)
}

/// Load configuration from an optional TOML file with environment variable overrides.
///
/// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_FILE`] is used
/// if present.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            Toml::file(path)
        }
        None => Toml::file(DEFAULT_CONFIG_FILE),
    };

    Figment::new()
        .merge(file)
        .merge(env_provider())
        .merge(text_env_provider())
        .extract()
        .map_err(|e| match &e.kind {
            Kind::MissingField(field) => {
                ConfigError::MissingSetting(env_key_for_field(field).to_string())
            }
            _ => ConfigError::ParseError(e.to_string()),
        })
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
