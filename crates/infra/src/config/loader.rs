//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PROCURA_SCREENING_BASE_URL`: Screening API base URL (required)
//! - `PROCURA_SCREENING_TIMEOUT_SECS`: Per-call timeout (optional)
//! - `PROCURA_SCREENING_MAX_RETRIES`: Retry count (optional)
//! - `PROCURA_SCREENING_BACKOFF_BASE_SECS`: Backoff base delay (optional)
//! - `PROCURA_SCREENING_BREAKER_THRESHOLD`: Breaker failure threshold (optional)
//! - `PROCURA_SCREENING_BREAKER_COOLDOWN_SECS`: Breaker cool-down (optional)
//! - `PROCURA_IDENTITY_DOMAIN`: Identity-provider domain (required)
//! - `PROCURA_IDENTITY_CLIENT_ID`: OAuth client id (required)
//! - `PROCURA_IDENTITY_CLIENT_SECRET`: OAuth client secret (required)
//! - `PROCURA_IDENTITY_AUDIENCE`: Token audience (required)

use std::path::{Path, PathBuf};

use procura_domain::{Config, IdentityConfig, ProcuraError, Result, ScreeningConfig};
use url::Url;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ProcuraError::Config` if configuration cannot be loaded from
/// either source or fails validation.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Required variables must be present; resilience knobs fall back to the
/// documented defaults.
///
/// # Errors
/// Returns `ProcuraError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("PROCURA_SCREENING_BASE_URL")?;

    let mut screening = ScreeningConfig::new(base_url);
    if let Some(timeout) = env_parse::<u64>("PROCURA_SCREENING_TIMEOUT_SECS")? {
        screening.timeout_secs = timeout;
    }
    if let Some(retries) = env_parse::<u32>("PROCURA_SCREENING_MAX_RETRIES")? {
        screening.max_retries = retries;
    }
    if let Some(base) = env_parse::<u64>("PROCURA_SCREENING_BACKOFF_BASE_SECS")? {
        screening.backoff_base_secs = base;
    }
    if let Some(threshold) = env_parse::<u64>("PROCURA_SCREENING_BREAKER_THRESHOLD")? {
        screening.breaker_failure_threshold = threshold;
    }
    if let Some(cooldown) = env_parse::<u64>("PROCURA_SCREENING_BREAKER_COOLDOWN_SECS")? {
        screening.breaker_cooldown_secs = cooldown;
    }

    let identity = IdentityConfig {
        domain: env_var("PROCURA_IDENTITY_DOMAIN")?,
        client_id: env_var("PROCURA_IDENTITY_CLIENT_ID")?,
        client_secret: env_var("PROCURA_IDENTITY_CLIENT_SECRET")?,
        audience: env_var("PROCURA_IDENTITY_AUDIENCE")?,
    };

    let config = Config { screening, identity };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ProcuraError::Config` if no file is found, the format is
/// invalid, or validation fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ProcuraError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ProcuraError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ProcuraError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ProcuraError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ProcuraError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ProcuraError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe standard locations for a configuration file
///
/// Searches the working directory and up to two parents for
/// `config.{toml,json}` and `procura.{toml,json}`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            for name in ["config.toml", "config.json", "procura.toml", "procura.json"] {
                candidates.push(cwd.join(format!("{prefix}{name}")));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn validate(config: &Config) -> Result<()> {
    Url::parse(&config.screening.base_url)
        .map_err(|e| ProcuraError::Config(format!("Invalid screening base URL: {e}")))?;

    for (field, value) in [
        ("identity domain", &config.identity.domain),
        ("identity client_id", &config.identity.client_id),
        ("identity client_secret", &config.identity.client_secret),
        ("identity audience", &config.identity.audience),
    ] {
        if value.trim().is_empty() {
            return Err(ProcuraError::Config(format!("Missing {field}")));
        }
    }
    Ok(())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ProcuraError::Config(format!("Missing required environment variable: {key}")))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ProcuraError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        "PROCURA_SCREENING_BASE_URL",
        "PROCURA_SCREENING_TIMEOUT_SECS",
        "PROCURA_SCREENING_MAX_RETRIES",
        "PROCURA_SCREENING_BACKOFF_BASE_SECS",
        "PROCURA_SCREENING_BREAKER_THRESHOLD",
        "PROCURA_SCREENING_BREAKER_COOLDOWN_SECS",
        "PROCURA_IDENTITY_DOMAIN",
        "PROCURA_IDENTITY_CLIENT_ID",
        "PROCURA_IDENTITY_CLIENT_SECRET",
        "PROCURA_IDENTITY_AUDIENCE",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("PROCURA_SCREENING_BASE_URL", "https://screening.example.com");
        std::env::set_var("PROCURA_IDENTITY_DOMAIN", "tenant.eu.auth0.com");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_ID", "client");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_SECRET", "secret");
        std::env::set_var("PROCURA_IDENTITY_AUDIENCE", "https://screening.example.com");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.screening.base_url, "https://screening.example.com");
        assert_eq!(config.screening.max_retries, 3);
        assert_eq!(config.screening.breaker_failure_threshold, 5);
        assert_eq!(config.identity.client_id, "client");

        clear_env();
    }

    #[test]
    fn test_env_overrides_resilience_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("PROCURA_SCREENING_BASE_URL", "https://screening.example.com");
        std::env::set_var("PROCURA_SCREENING_MAX_RETRIES", "1");
        std::env::set_var("PROCURA_SCREENING_BREAKER_COOLDOWN_SECS", "60");
        std::env::set_var("PROCURA_IDENTITY_DOMAIN", "tenant.eu.auth0.com");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_ID", "client");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_SECRET", "secret");
        std::env::set_var("PROCURA_IDENTITY_AUDIENCE", "https://screening.example.com");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.screening.max_retries, 1);
        assert_eq!(config.screening.breaker_cooldown_secs, 60);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(ProcuraError::Config(_))));
    }

    #[test]
    fn test_load_from_env_rejects_invalid_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("PROCURA_SCREENING_BASE_URL", "not a url");
        std::env::set_var("PROCURA_IDENTITY_DOMAIN", "tenant.eu.auth0.com");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_ID", "client");
        std::env::set_var("PROCURA_IDENTITY_CLIENT_SECRET", "secret");
        std::env::set_var("PROCURA_IDENTITY_AUDIENCE", "https://screening.example.com");

        let result = load_from_env();
        assert!(matches!(result, Err(ProcuraError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[screening]
base_url = "https://screening.example.com"
max_retries = 2

[identity]
domain = "tenant.eu.auth0.com"
client_id = "client"
client_secret = "secret"
audience = "https://screening.example.com"
"#;

        let mut temp_file = NamedTempFile::new().expect("temp file");
        temp_file.write_all(toml_content.as_bytes()).expect("write");
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).expect("copy");

        let config = load_from_file(Some(path.clone())).expect("config from file");
        assert_eq!(config.screening.max_retries, 2);
        // Unspecified knobs take the documented defaults
        assert_eq!(config.screening.breaker_failure_threshold, 5);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "screening": { "base_url": "https://screening.example.com" },
            "identity": {
                "domain": "tenant.eu.auth0.com",
                "client_id": "client",
                "client_secret": "secret",
                "audience": "https://screening.example.com"
            }
        }"#;

        let mut temp_file = NamedTempFile::new().expect("temp file");
        temp_file.write_all(json_content.as_bytes()).expect("write");
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).expect("copy");

        let config = load_from_file(Some(path.clone())).expect("config from file");
        assert_eq!(config.screening.timeout_secs, 60);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ProcuraError::Config(_))));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let result = parse_config("key: value", &PathBuf::from("config.yaml"));
        assert!(matches!(result, Err(ProcuraError::Config(_))));
    }
}
