use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://your.api.example.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_RESOURCE_DIR: &str = "resources";
pub const DEFAULT_FALLBACK_RESOURCE: &str = "properties";
pub const DEFAULT_FAVORITES_DIR: &str = "data";

/// Application settings. Every key has a hardcoded default, so resolution never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub base_url: String,
    pub use_api: bool,
    pub use_fallback: bool,
    pub log_level: String,
    pub api_timeout: Duration,
    pub resource_dir: PathBuf,
    pub fallback_resource: String,
    pub favorites_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Read settings from the process environment (and `.env`, if present)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = value("BASE_URL")
            .filter(|s| Url::parse(s).is_ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_timeout = value("API_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self {
            base_url,
            use_api: parse_bool(value("USE_API").as_deref(), true),
            use_fallback: parse_bool(value("USE_FALLBACK").as_deref(), true),
            log_level: value("LOG_LEVEL")
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            api_timeout,
            resource_dir: value("RESOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_DIR)),
            fallback_resource: value("FALLBACK_RESOURCE")
                .unwrap_or_else(|| DEFAULT_FALLBACK_RESOURCE.to_string()),
            favorites_dir: value("FAVORITES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_DIR)),
        }
    }
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|s| s.to_lowercase()).as_deref() {
        Some("1" | "true" | "yes") => true,
        Some("0" | "false" | "no") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.use_api);
        assert!(config.use_fallback);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.api_timeout, Duration::from_secs(15));
        assert_eq!(config.resource_dir, PathBuf::from("resources"));
        assert_eq!(config.fallback_resource, "properties");
        assert_eq!(config.favorites_dir, PathBuf::from("data"));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BASE_URL", "http://localhost:8080/api"),
            ("USE_API", " No "),
            ("USE_FALLBACK", "0"),
            ("LOG_LEVEL", "DEBUG"),
            ("API_TIMEOUT_SECONDS", "2.5"),
            ("FAVORITES_DIR", "/var/lib/rental-scout"),
        ]);
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert!(!config.use_api);
        assert!(!config.use_fallback);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_timeout, Duration::from_millis(2500));
        assert_eq!(config.favorites_dir, PathBuf::from("/var/lib/rental-scout"));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("BASE_URL", "not a url"),
            ("USE_API", "maybe"),
            ("API_TIMEOUT_SECONDS", "-3"),
        ]);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.use_api);
        assert_eq!(config.api_timeout, Duration::from_secs(15));
    }
}
