//! Error types for request dispatch failures.
//!
//! Every protocol or engine failure maps to a stable wire code so clients
//! can branch on the first two words of an `ERR` line without parsing the
//! human-readable message.

use std::io;
use std::time::Duration;

use sylva_engine::EngineError;
use thiserror::Error;

/// Errors surfaced while reading, parsing or executing a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line was blank.
    #[error("empty request")]
    EmptyRequest,

    /// The base command is not one the daemon understands.
    #[error("unknown command: {command}")]
    UnknownCommand { command: String },

    /// A command that needs text was sent without any.
    #[error("{command} requires an argument")]
    MissingArgument { command: &'static str },

    /// `dependencies` was sent without a `:MODE` modifier.
    #[error("dependencies requires a mode, e.g. dependencies:COLLAPSED_TREE")]
    MissingMode,

    /// The request line exceeded the configured limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// The request line was not valid UTF-8.
    #[error("request is not valid UTF-8")]
    InvalidUtf8,

    /// The client did not finish its request line in time.
    #[error("timed out waiting for the request line")]
    ReadTimeout,

    /// The dependency mode is not supported by the engine.
    #[error("unsupported dependency mode: {mode}")]
    UnsupportedMode { mode: String },

    /// Tokenization left nothing to parse.
    #[error("no tokens to parse")]
    EmptyInput,

    /// The engine could not analyse the input.
    #[error("parse failed: {message}")]
    ParseFailed { message: String },

    /// The engine did not finish within the parse deadline.
    #[error("engine did not finish within {} ms", limit.as_millis())]
    Timeout { limit: Duration },

    /// Internal failure such as a crashed engine worker.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// IO error on the connection itself.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DispatchError {
    /// Stable code written after `ERR` on the wire.
    #[must_use]
    pub const fn wire_code(&self) -> &'static str {
        match self {
            Self::EmptyRequest => "empty-request",
            Self::UnknownCommand { .. } => "unknown-command",
            Self::MissingArgument { .. } => "missing-argument",
            Self::MissingMode => "missing-mode",
            Self::RequestTooLarge { .. } => "request-too-large",
            Self::InvalidUtf8 => "invalid-utf8",
            Self::ReadTimeout => "read-timeout",
            Self::UnsupportedMode { .. } => "unsupported-mode",
            Self::EmptyInput => "empty-input",
            Self::ParseFailed { .. } => "parse-failed",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } | Self::Io(_) => "internal",
        }
    }

    /// Whether `silent_errors` turns this error into a silent close.
    #[must_use]
    pub const fn is_silenceable(&self) -> bool {
        matches!(
            self,
            Self::EmptyRequest | Self::UnknownCommand { .. } | Self::MissingArgument { .. }
        )
    }

    /// Whether the error should be reported to the client at all. Broken
    /// connections cannot carry a reply.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Creates an unknown command error.
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates a missing argument error.
    #[must_use]
    pub const fn missing_argument(command: &'static str) -> Self {
        Self::MissingArgument { command }
    }

    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates a deadline error.
    #[must_use]
    pub const fn timeout(limit: Duration) -> Self {
        Self::Timeout { limit }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<EngineError> for DispatchError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::EmptyInput => Self::EmptyInput,
            EngineError::UnsupportedMode { mode } => Self::UnsupportedMode { mode },
            EngineError::ParseFailed { message } => Self::ParseFailed { message },
            other => Self::internal(other.to_string()),
        }
    }
}
