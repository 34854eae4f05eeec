//! Configuration for the webhook worker endpoint
//!
//! Loads from environment variables (optionally via .env), with an optional
//! config.yml on top. Environment variables take precedence over file values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Environment variable holding the worker endpoint URL.
pub const WORKER_URL_ENV: &str = "WORKER_URL";
/// Environment variable holding the optional bearer token.
pub const TOKEN_ENV: &str = "TOKEN";

/// YAML config structure
#[derive(Debug, Deserialize)]
struct YamlConfig {
    worker: Option<WorkerConfig>,
}

#[derive(Debug, Deserialize)]
struct WorkerConfig {
    url: Option<String>,
    token: Option<String>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Webhook worker endpoint. May already carry query parameters.
    pub worker_url: String,
    /// Optional bearer token, sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or fall back to environment only.
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::from_env())
    }

    /// Build configuration from environment variables alone.
    pub fn from_env() -> Self {
        Self::load_dotenv();
        Self {
            worker_url: non_empty(std::env::var(WORKER_URL_ENV).ok()).unwrap_or_default(),
            token: non_empty(std::env::var(TOKEN_ENV).ok()),
        }
    }

    /// Load configuration from a specific YAML file.
    /// Environment variables take precedence over file values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        let worker = yaml.worker.unwrap_or(WorkerConfig {
            url: None,
            token: None,
        });

        Ok(Self {
            worker_url: Self::resolve_env_string(worker.url, WORKER_URL_ENV),
            token: non_empty(Some(Self::resolve_env_string(worker.token, TOKEN_ENV))),
        })
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR},
    /// then the explicit env key, then the literal file value.
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return env_val.trim().to_string();
                }
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            let env_val = env_val.trim();
            if !env_val.is_empty() {
                return env_val.to_string();
            }
        }
        value.unwrap_or_default().trim().to_string()
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// True when a worker endpoint is configured.
    pub fn has_endpoint(&self) -> bool {
        !self.worker_url.trim().is_empty()
    }
}

/// Normalize optional strings: whitespace-only counts as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_non_empty_filters_whitespace() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some(" https://w.dev ".to_string())),
            Some("https://w.dev".to_string())
        );
    }

    #[test]
    fn test_has_endpoint() {
        let config = Config {
            worker_url: String::new(),
            token: None,
        };
        assert!(!config.has_endpoint());

        let config = Config {
            worker_url: "https://worker.example.dev".to_string(),
            token: None,
        };
        assert!(config.has_endpoint());
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file("/nonexistent/config.yml");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "worker: [not a mapping").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_from_file_literal_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "worker:").unwrap();
        writeln!(file, "  url: https://file.example.dev").unwrap();
        writeln!(file, "  token: file-token").unwrap();

        // Only meaningful when the env vars are unset in the test runner.
        if std::env::var(WORKER_URL_ENV).is_err() && std::env::var(TOKEN_ENV).is_err() {
            let config = Config::load_from_file(file.path()).unwrap();
            assert_eq!(config.worker_url, "https://file.example.dev");
            assert_eq!(config.token.as_deref(), Some("file-token"));
        }
    }

    #[test]
    fn test_load_from_file_empty_token_is_unset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "worker:").unwrap();
        writeln!(file, "  url: https://file.example.dev").unwrap();

        if std::env::var(TOKEN_ENV).is_err() {
            let config = Config::load_from_file(file.path()).unwrap();
            assert_eq!(config.token, None);
        }
    }

    #[test]
    fn test_resolve_env_string_indirection() {
        std::env::set_var("QYWX_TEST_INDIRECT", "from-env");
        let resolved = Config::resolve_env_string(
            Some("${QYWX_TEST_INDIRECT}".to_string()),
            "QYWX_TEST_UNSET_KEY",
        );
        assert_eq!(resolved, "from-env");
        std::env::remove_var("QYWX_TEST_INDIRECT");
    }

    #[test]
    fn test_resolve_env_string_literal_fallback() {
        let resolved =
            Config::resolve_env_string(Some("literal".to_string()), "QYWX_TEST_UNSET_KEY");
        assert_eq!(resolved, "literal");
    }

    #[test]
    fn test_config_clone_and_debug() {
        let config = Config {
            worker_url: "https://w".to_string(),
            token: Some("t".to_string()),
        };
        let cloned = config.clone();
        assert_eq!(cloned.worker_url, "https://w");
        assert!(format!("{:?}", config).contains("Config"));
    }
}
