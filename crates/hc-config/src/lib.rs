//! Holacracy Platform Configuration
//!
//! TOML-based configuration with `HOLACRACY_*` environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use hc_common::LogFormat;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,

    /// Enable development mode
    pub dev_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl HttpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Entity store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://holacracy.db?mode=rwc`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://holacracy.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// How bearer tokens are turned into identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Fixed token table from `identity.static_tokens`
    Static,
    /// RS256 ID tokens verified against the provider's JWKS
    #[default]
    Oidc,
}

impl std::str::FromStr for IdentityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "oidc" => Ok(Self::Oidc),
            other => Err(ConfigError::EnvError(format!(
                "unknown identity mode '{}' (expected 'static' or 'oidc')",
                other
            ))),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub mode: IdentityMode,

    /// OIDC issuer; discovery is read from `{issuer_url}/.well-known/openid-configuration`
    pub issuer_url: String,

    /// Expected `aud` claim
    pub audience: String,

    pub jwks_cache_ttl_secs: u64,

    /// Token fixtures for `mode = "static"`
    pub static_tokens: Vec<StaticTokenConfig>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::Oidc,
            issuer_url: String::new(),
            audience: String::new(),
            jwks_cache_ttl_secs: 3600,
            static_tokens: Vec::new(),
        }
    }
}

/// One static token fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticTokenConfig {
    pub token: String,
    pub external_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    /// Reject the token as expired
    #[serde(default)]
    pub expired: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject combinations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.url is required".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        match self.identity.mode {
            IdentityMode::Oidc => {
                if self.identity.issuer_url.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "identity.issuer_url is required in oidc mode".to_string(),
                    ));
                }
                if self.identity.audience.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "identity.audience is required in oidc mode".to_string(),
                    ));
                }
            }
            IdentityMode::Static => {
                if !self.dev_mode {
                    return Err(ConfigError::ValidationError(
                        "identity.mode = \"static\" is only allowed with dev_mode = true".to_string(),
                    ));
                }
                let mut seen = std::collections::HashSet::new();
                for fixture in &self.identity.static_tokens {
                    if !seen.insert(fixture.token.as_str()) {
                        return Err(ConfigError::ValidationError(format!(
                            "duplicate static token for '{}'",
                            fixture.external_id
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Holacracy Platform Configuration
# Environment variables (HOLACRACY_*) override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = ["http://localhost:3000"]

[database]
url = "sqlite://holacracy.db?mode=rwc"
max_connections = 5

[identity]
mode = "oidc"  # oidc or static (static requires dev_mode)
issuer_url = "https://login.example.com"
audience = "holacracy-platform"
jwks_cache_ttl_secs = 3600

# [[identity.static_tokens]]
# token = "dev-token"
# external_id = "dev|1"
# first_name = "Dev"
# last_name = "User"
# email = "dev@example.com"

[logging]
format = "text"  # text or json

dev_mode = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.identity.mode, IdentityMode::Oidc);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.identity.audience, "holacracy-platform");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_with_static_tokens() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
dev_mode = true

[identity]
mode = "static"

[[identity.static_tokens]]
token = "alice-token"
external_id = "auth0|alice"
first_name = "Alice"
email = "alice@example.com"

[[identity.static_tokens]]
token = "stale-token"
external_id = "auth0|stale"
email = "stale@example.com"
expired = true
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.identity.mode, IdentityMode::Static);
        assert_eq!(config.identity.static_tokens.len(), 2);
        assert_eq!(config.identity.static_tokens[0].first_name.as_deref(), Some("Alice"));
        assert!(config.identity.static_tokens[1].expired);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oidc_without_issuer() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_static_outside_dev_mode() {
        let mut config = AppConfig::default();
        config.identity.mode = IdentityMode::Static;
        assert!(config.validate().is_err());

        config.dev_mode = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\nport = ").unwrap();
        assert!(matches!(AppConfig::from_file(file.path()), Err(ConfigError::ParseError(_))));
    }
}
