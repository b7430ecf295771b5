use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::geo::provider::DEFAULT_PHOTON_URL;
use crate::geo::CachePolicy;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "intern-scout.toml";
pub const ENV_PREFIX: &str = "INTERN_SCOUT";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub geocoding: GeocodingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocodingSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Spacing between remote geocoding requests
    pub delay_ms: u64,
    pub cache_path: PathBuf,
    /// Unset keeps cached coordinates forever
    pub cache_ttl_days: Option<i64>,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PHOTON_URL.to_string(),
            user_agent: concat!("intern-scout/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            delay_ms: 200,
            cache_path: PathBuf::from("geocoding_cache.json"),
            cache_ttl_days: None,
        }
    }
}

impl GeocodingSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn cache_policy(&self) -> CachePolicy {
        match self.cache_ttl_days {
            Some(days) if days > 0 => CachePolicy::expire_after(chrono::Duration::days(days)),
            _ => CachePolicy::never_expire(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then `INTERN_SCOUT__SECTION__KEY`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf()),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.geocoding.request_delay(), Duration::from_millis(200));
        assert_eq!(config.geocoding.cache_policy(), CachePolicy::never_expire());
        assert_eq!(config.geocoding.base_url, DEFAULT_PHOTON_URL);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://karrier.example.hu"
token = "abc"

[geocoding]
delay_ms = 500
cache_ttl_days = 90
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "https://karrier.example.hu");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.geocoding.request_delay(), Duration::from_millis(500));
        assert_eq!(
            config.geocoding.cache_policy(),
            CachePolicy::expire_after(chrono::Duration::days(90))
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
