//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "holacracy.toml",
    "./config/config.toml",
    "./config/holacracy.toml",
    "/etc/holacracy/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit variable source.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup)?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured file does not exist, searching defaults");
        }

        if let Some(path) = lookup("HOLACRACY_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvError(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}

/// Apply `HOLACRACY_*` overrides on top of file/default values
fn apply_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = parse_var(lookup, "HOLACRACY_HTTP_PORT")? {
        config.http.port = port;
    }
    if let Some(host) = lookup("HOLACRACY_HTTP_HOST") {
        config.http.host = host;
    }
    if let Some(origins) = lookup("HOLACRACY_CORS_ORIGINS") {
        config.http.cors_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Database
    if let Some(url) = lookup("HOLACRACY_DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(max) = parse_var(lookup, "HOLACRACY_DATABASE_MAX_CONNECTIONS")? {
        config.database.max_connections = max;
    }

    // Identity
    if let Some(mode) = parse_var(lookup, "HOLACRACY_IDENTITY_MODE")? {
        config.identity.mode = mode;
    }
    if let Some(issuer) = lookup("HOLACRACY_OIDC_ISSUER_URL") {
        config.identity.issuer_url = issuer;
    }
    if let Some(audience) = lookup("HOLACRACY_OIDC_AUDIENCE") {
        config.identity.audience = audience;
    }
    if let Some(ttl) = parse_var(lookup, "HOLACRACY_JWKS_CACHE_TTL_SECS")? {
        config.identity.jwks_cache_ttl_secs = ttl;
    }

    // Logging; LOG_FORMAT is honoured for parity with other services
    let format = match lookup("HOLACRACY_LOG_FORMAT") {
        Some(v) => Some(v),
        None => lookup("LOG_FORMAT"),
    };
    if let Some(format) = format {
        config.logging.format = format
            .parse()
            .map_err(|e: hc_common::logging::UnknownLogFormat| ConfigError::EnvError(e.to_string()))?;
    }

    // General
    if let Some(dev_mode) = parse_var(lookup, "HOLACRACY_DEV_MODE")? {
        config.dev_mode = dev_mode;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdentityMode, LogFormat};
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_env_overrides_applied() {
        let env = vars(&[
            ("HOLACRACY_HTTP_PORT", "9000"),
            ("HOLACRACY_DATABASE_URL", "sqlite::memory:"),
            ("HOLACRACY_IDENTITY_MODE", "static"),
            ("HOLACRACY_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("LOG_FORMAT", "json"),
            ("HOLACRACY_DEV_MODE", "true"),
        ]);

        let loader = ConfigLoader::with_path("/nonexistent/holacracy.toml");
        let config = loader.load_with(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.identity.mode, IdentityMode::Static);
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.dev_mode);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 7000\nhost = \"127.0.0.1\"").unwrap();

        let env = vars(&[("HOLACRACY_HTTP_PORT", "7100")]);
        let config = ConfigLoader::with_path(file.path())
            .load_with(|k| env.get(k).cloned())
            .unwrap();

        assert_eq!(config.http.port, 7100);
        assert_eq!(config.http.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_numeric_override_is_error() {
        let env = vars(&[("HOLACRACY_HTTP_PORT", "eighty")]);
        let result = ConfigLoader::with_path("/nonexistent/holacracy.toml")
            .load_with(|k| env.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    }

    #[test]
    fn test_unknown_identity_mode_is_error() {
        let env = vars(&[("HOLACRACY_IDENTITY_MODE", "saml")]);
        let result = ConfigLoader::with_path("/nonexistent/holacracy.toml")
            .load_with(|k| env.get(k).cloned());
        assert!(result.is_err());
    }
}
