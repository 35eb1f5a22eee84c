use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "market_triggers.log";
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org";

/// Process-wide settings, loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent disables the yield curve indicator
    pub fred_api_key: Option<String>,
    pub log_file: PathBuf,
    pub check_interval_minutes: u64,
    pub http_timeout_seconds: u64,
    pub yahoo_base_url: String,
    pub fred_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            check_interval_minutes: DEFAULT_CHECK_INTERVAL_MINUTES,
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment. A `.env` file is picked up if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let fred_api_key = lookup("FRED_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let log_file = lookup("LOG_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let check_interval_minutes = positive_int(&lookup, "CHECK_INTERVAL_MINUTES", defaults.check_interval_minutes)?;
        if check_interval_minutes.checked_mul(60).is_none() {
            return Err(anyhow!(
                "CHECK_INTERVAL_MINUTES is too large to express in seconds: {}",
                check_interval_minutes
            ));
        }
        let http_timeout_seconds = positive_int(&lookup, "HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds)?;

        let yahoo_base_url = lookup("YAHOO_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.yahoo_base_url);
        let fred_base_url = lookup("FRED_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.fred_base_url);

        Ok(Self {
            fred_api_key,
            log_file,
            check_interval_minutes,
            http_timeout_seconds,
            yahoo_base_url,
            fred_base_url,
        })
    }

    pub fn check_interval(&self) -> Duration {
        // from_lookup rejects overflow; saturate for hand-built configs
        Duration::from_secs(self.check_interval_minutes.saturating_mul(60))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

fn positive_int<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let value: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", key, raw))?;
            if value == 0 {
                return Err(anyhow!("{} must be greater than zero", key));
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.fred_api_key, None);
        assert_eq!(config.log_file, PathBuf::from("market_triggers.log"));
        assert_eq!(config.check_interval_minutes, 30);
        assert_eq!(config.check_interval(), Duration::from_secs(1800));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_reads_all_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("FRED_API_KEY", "  abc123  "),
            ("LOG_FILE", "/tmp/triggers.log"),
            ("CHECK_INTERVAL_MINUTES", "5"),
            ("YAHOO_BASE_URL", "http://127.0.0.1:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.fred_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/triggers.log"));
        assert_eq!(config.check_interval(), Duration::from_secs(300));
        assert_eq!(config.yahoo_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = Config::from_lookup(lookup_from(&[("FRED_API_KEY", "   ")])).unwrap();
        assert!(config.fred_api_key.is_none());
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(Config::from_lookup(lookup_from(&[("CHECK_INTERVAL_MINUTES", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CHECK_INTERVAL_MINUTES", "half")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CHECK_INTERVAL_MINUTES", "-5")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CHECK_INTERVAL_MINUTES", "400000000000000000")])).is_err());
    }

    #[test]
    fn test_largest_interval_that_fits_in_seconds() {
        let max_minutes = (u64::MAX / 60).to_string();
        let config = Config::from_lookup(lookup_from(&[("CHECK_INTERVAL_MINUTES", max_minutes.as_str())])).unwrap();
        assert_eq!(config.check_interval(), Duration::from_secs((u64::MAX / 60) * 60));

        let hand_built = Config { check_interval_minutes: u64::MAX, ..Config::default() };
        assert_eq!(hand_built.check_interval(), Duration::from_secs(u64::MAX));
    }
}
