//! Structured Logging
//!
//! Installs the global `tracing` subscriber for a service:
//! - JSON output for production log aggregation
//! - Human-readable output for local development (default)
//!
//! The output format comes from configuration, falling back to the
//! `LOG_FORMAT` environment variable. `RUST_LOG` controls filtering
//! (default: `info`), e.g. `RUST_LOG=hc_platform=debug,tower_http=info`.
//!
//! ```rust,ignore
//! use hc_common::logging::{init_logging, LogFormat};
//!
//! init_logging("hc-platform-server", LogFormat::from_env());
//! tracing::info!(organization_id = %id, "Organization created");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self as fmt_layer, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

#[derive(Debug, Error)]
#[error("unknown log format '{0}' (expected 'json' or 'text')")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" | "" => Ok(Self::Text),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Text => f.write_str("text"),
        }
    }
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; anything other than "json" means text.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests call this
/// more than once per process).
pub fn init_logging(service_name: &str, format: LogFormat) -> bool {
    let installed = match format {
        LogFormat::Json => init_json_logging(env_filter()),
        LogFormat::Text => init_text_logging(env_filter()),
    };

    if installed {
        tracing::info!(service = service_name, log_format = %format, "Logging initialized");
    }
    installed
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_json_logging(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt_layer::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .flatten_event(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .try_init()
        .is_ok()
}

fn init_text_logging(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt_layer::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_second_init_is_rejected() {
        init_logging("test", LogFormat::Text);
        assert!(!init_logging("test", LogFormat::Json));
    }
}
