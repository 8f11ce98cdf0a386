//! Exporter configuration
//!
//! Built once at startup from the process environment (after `.env` has been
//! loaded) and passed by reference to the exporter.

use std::path::PathBuf;
use std::time::Duration;

use harvest_client::{DEFAULT_LOG_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPOS_FILE: &str = "repos.csv";
pub const DEFAULT_MAX_RUNS: usize = 100;
pub const DEFAULT_RUN_DELAY: Duration = Duration::from_secs(1);

/// Exporter configuration
#[derive(Clone)]
pub struct Config {
    /// Bearer credential for the forge API
    pub token: String,

    /// Forge API base URL
    pub api_url: String,

    /// CSV file listing the repositories to export
    pub repos_file: PathBuf,

    /// Directory under which `{owner}_{repo}/` roots are created
    pub output_dir: PathBuf,

    /// Maximum number of runs exported per repository; `None` exports all
    pub max_runs: Option<usize>,

    /// Pause between consecutive runs
    pub run_delay: Duration,

    /// Timeout for metadata calls
    pub request_timeout: Duration,

    /// Timeout for log archive downloads
    pub log_timeout: Duration,
}

impl Config {
    /// Creates a configuration with defaults for everything but the credential
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            repos_file: PathBuf::from(DEFAULT_REPOS_FILE),
            output_dir: PathBuf::from("."),
            max_runs: Some(DEFAULT_MAX_RUNS),
            run_delay: DEFAULT_RUN_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_timeout: DEFAULT_LOG_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GITHUB_TOKEN (required)
    /// - GITHUB_API_URL (optional, default: https://api.github.com)
    /// - HARVEST_REPOS_FILE (optional, default: repos.csv)
    /// - HARVEST_OUTPUT_DIR (optional, default: current directory)
    /// - HARVEST_MAX_RUNS (optional, default: 100; `0` or `all` for no cap)
    /// - HARVEST_RUN_DELAY_MS (optional, default: 1000)
    /// - HARVEST_REQUEST_TIMEOUT_SECS (optional, default: 30)
    /// - HARVEST_LOG_TIMEOUT_SECS (optional, default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("GITHUB_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let mut config = Self::new(token);

        if let Some(api_url) = lookup("GITHUB_API_URL").filter(|s| !s.trim().is_empty()) {
            config.api_url = api_url.trim().to_string();
        }

        if let Some(repos_file) = lookup("HARVEST_REPOS_FILE").filter(|s| !s.is_empty()) {
            config.repos_file = PathBuf::from(repos_file);
        }

        if let Some(output_dir) = lookup("HARVEST_OUTPUT_DIR").filter(|s| !s.is_empty()) {
            config.output_dir = PathBuf::from(output_dir);
        }

        if let Some(max_runs) = lookup("HARVEST_MAX_RUNS") {
            config.max_runs = parse_max_runs(&max_runs).unwrap_or(config.max_runs);
        }

        config.run_delay = lookup("HARVEST_RUN_DELAY_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RUN_DELAY);

        config.request_timeout = lookup("HARVEST_REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        config.log_timeout = lookup("HARVEST_LOG_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LOG_TIMEOUT);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "api_url must start with http:// or https://".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.log_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "log_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// The credential never reaches the logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("repos_file", &self.repos_file)
            .field("output_dir", &self.output_dir)
            .field("max_runs", &self.max_runs)
            .field("run_delay", &self.run_delay)
            .field("request_timeout", &self.request_timeout)
            .field("log_timeout", &self.log_timeout)
            .finish()
    }
}

/// Parses a run cap: a count, or `0`/`all` for no cap
///
/// Returns `None` for unparseable input so the caller keeps its default.
fn parse_max_runs(raw: &str) -> Option<Option<usize>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("all") {
        return Some(None);
    }

    match raw.parse::<usize>() {
        Ok(0) => Some(None),
        Ok(n) => Some(Some(n)),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::new("token");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.repos_file, PathBuf::from("repos.csv"));
        assert_eq!(config.max_runs, Some(100));
        assert_eq!(config.run_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingCredential)));

        let result = Config::from_lookup(lookup_from(&[("GITHUB_TOKEN", "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_secret\n"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
            ("HARVEST_REPOS_FILE", "lists/repos.csv"),
            ("HARVEST_OUTPUT_DIR", "out"),
            ("HARVEST_MAX_RUNS", "25"),
            ("HARVEST_RUN_DELAY_MS", "250"),
            ("HARVEST_LOG_TIMEOUT_SECS", "120"),
        ]))
        .unwrap();

        assert_eq!(config.token, "ghp_secret");
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.repos_file, PathBuf::from("lists/repos.csv"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.max_runs, Some(25));
        assert_eq!(config.run_delay, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_max_runs_parsing() {
        assert_eq!(parse_max_runs("all"), Some(None));
        assert_eq!(parse_max_runs("0"), Some(None));
        assert_eq!(parse_max_runs(" 7 "), Some(Some(7)));
        assert_eq!(parse_max_runs("lots"), None);

        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "t"),
            ("HARVEST_MAX_RUNS", "lots"),
        ]))
        .unwrap();
        assert_eq!(config.max_runs, Some(DEFAULT_MAX_RUNS));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::new("token");
        assert!(config.validate().is_ok());

        config.api_url = "api.github.com".to_string();
        assert!(config.validate().is_err());

        config.api_url = DEFAULT_API_URL.to_string();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("ghp_secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
