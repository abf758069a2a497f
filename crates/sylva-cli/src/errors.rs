//! Error types for the CLI runtime.

use std::io;

use sylva_engine::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("{command} requires text to analyse")]
    MissingText { command: &'static str },
    #[error("text must fit on a single line")]
    MultilineText,
    #[error("dependency mode '{mode}' must be a single word")]
    InvalidMode { mode: String },
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[error("failed to send request to daemon: {0}")]
    SendRequest(io::Error),
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(io::Error),
    #[error("daemon closed the connection without answering {command}")]
    EmptyReply { command: &'static str },
    #[error("daemon returned a text reply that is not UTF-8")]
    InvalidReply,
    #[error("failed to decode tree from daemon: {0}")]
    DecodeTree(#[from] DecodeError),
    #[error("failed to forward daemon output: {0}")]
    ForwardResponse(io::Error),
    /// The daemon answered with an `ERR` line, carried here verbatim.
    #[error("{line}")]
    Daemon { line: String },
}
