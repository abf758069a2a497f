//! Shared configuration for the sylva parser daemon and its client.
//!
//! [`Config`] is assembled by `ortho_config` from, in order of precedence,
//! command-line flags, `SYLVA_*` environment variables, a TOML file named by
//! `--config-path` (or `SYLVA_CONFIG_PATH`), and the built-in defaults in
//! [`defaults`]. The model identifiers are opaque here: the parsing engine
//! decides what `builtin` or a path means.

pub mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    BUILTIN_MODEL, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SYLVA")]
pub struct Config {
    /// Address the listener binds to.
    #[serde(default = "defaults::default_host")]
    #[ortho_config(default = defaults::default_host())]
    pub host: String,
    /// TCP port the listener binds to.
    #[serde(default = "defaults::default_port")]
    #[ortho_config(default = defaults::default_port())]
    pub port: u16,
    /// Parser model identifier handed to the engine.
    #[serde(default = "defaults::default_model")]
    #[ortho_config(default = defaults::default_model())]
    pub model: String,
    /// Optional tagger model identifier handed to the engine.
    #[serde(default)]
    pub tagger: Option<String>,
    /// Tracing filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Upper bound on connections serviced at the same time.
    #[serde(default = "defaults::default_max_connections")]
    #[ortho_config(default = defaults::default_max_connections())]
    pub max_connections: usize,
    /// Socket read and write timeout in milliseconds; zero disables it.
    #[serde(default = "defaults::default_read_timeout_ms")]
    #[ortho_config(default = defaults::default_read_timeout_ms())]
    pub read_timeout_ms: u64,
    /// Engine deadline per request in milliseconds; zero disables it.
    #[serde(default = "defaults::default_parse_timeout_ms")]
    #[ortho_config(default = defaults::default_parse_timeout_ms())]
    pub parse_timeout_ms: u64,
    /// Maximum request line length in bytes.
    #[serde(default = "defaults::default_max_request_bytes")]
    #[ortho_config(default = defaults::default_max_request_bytes())]
    pub max_request_bytes: usize,
    /// Close the connection without a reply on protocol errors.
    #[serde(default)]
    #[ortho_config(default = false)]
    pub silent_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::default_host(),
            port: defaults::default_port(),
            model: defaults::default_model(),
            tagger: None,
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            max_connections: defaults::default_max_connections(),
            read_timeout_ms: defaults::default_read_timeout_ms(),
            parse_timeout_ms: defaults::default_parse_timeout_ms(),
            max_request_bytes: defaults::default_max_request_bytes(),
            silent_errors: false,
        }
    }
}

impl Config {
    /// Bind address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Listening port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` form suitable for logging.
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parser model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Tagger model identifier, when configured.
    #[must_use]
    pub fn tagger(&self) -> Option<&str> {
        self.tagger.as_deref()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Upper bound on concurrently serviced connections.
    #[must_use]
    pub const fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Socket timeout, or `None` when disabled.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        millis_or_none(self.read_timeout_ms)
    }

    /// Engine deadline, or `None` when disabled.
    #[must_use]
    pub const fn parse_timeout(&self) -> Option<Duration> {
        millis_or_none(self.parse_timeout_ms)
    }

    /// Maximum request line length in bytes.
    #[must_use]
    pub const fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }

    /// Whether protocol errors are swallowed instead of reported.
    #[must_use]
    pub const fn silent_errors(&self) -> bool {
        self.silent_errors
    }

    /// Rejects values the daemon cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] when a limit is zero or the host is
    /// blank.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.host.trim().is_empty() {
            return Err(ConfigValidationError::EmptyHost);
        }
        if self.max_connections == 0 {
            return Err(ConfigValidationError::ZeroLimit {
                field: "max_connections",
            });
        }
        if self.max_request_bytes == 0 {
            return Err(ConfigValidationError::ZeroLimit {
                field: "max_request_bytes",
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModel);
        }
        Ok(())
    }
}

const fn millis_or_none(value: u64) -> Option<Duration> {
    if value == 0 {
        None
    } else {
        Some(Duration::from_millis(value))
    }
}

/// Semantic problems detected after the configuration layers merged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// The bind address was empty.
    #[error("host must not be empty")]
    EmptyHost,
    /// The model identifier was empty.
    #[error("model must not be empty")]
    EmptyModel,
    /// A limit that must be positive was zero.
    #[error("{field} must be greater than zero")]
    ZeroLimit {
        /// Name of the offending field.
        field: &'static str,
    },
}
