//! Error types for parsing engine operations.
//!
//! Engine failures are ordinary values: callers decide how to report them.
//! The daemon renders them as protocol error lines.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading models or analysing text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The text contained no tokens to analyse.
    #[error("input contains no tokens")]
    EmptyInput,

    /// The requested dependency representation is not available.
    #[error("dependency mode '{mode}' is not supported")]
    UnsupportedMode {
        /// The mode name exactly as requested.
        mode: String,
    },

    /// The analyser could not build a structure for the input.
    #[error("failed to parse input: {message}")]
    ParseFailed {
        /// Description of the failure.
        message: String,
    },

    /// A model file could not be read.
    #[error("failed to read model '{path}': {source}")]
    ModelRead {
        /// Path of the model file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A model file was not valid model JSON.
    #[error("model '{path}' is malformed: {source}")]
    ModelFormat {
        /// Path of the model file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A model lexicon used a tag outside the supported tag set.
    #[error("model '{path}' assigns unknown tag '{tag}' to '{word}'")]
    UnknownTag {
        /// Path of the model file.
        path: Utf8PathBuf,
        /// Word carrying the tag.
        word: String,
        /// The rejected tag.
        tag: String,
    },
}

impl EngineError {
    /// Creates an unsupported mode error.
    #[must_use]
    pub fn unsupported_mode(mode: impl Into<String>) -> Self {
        Self::UnsupportedMode { mode: mode.into() }
    }

    /// Creates a parse failure.
    #[must_use]
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::ParseFailed {
            message: message.into(),
        }
    }
}

/// Errors raised while decoding the binary tree encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The stream did not start with the format magic.
    #[error("missing tree encoding magic")]
    BadMagic,
    /// The stream announced a version this decoder does not understand.
    #[error("unsupported tree encoding version {version}")]
    UnsupportedVersion {
        /// Version byte found in the stream.
        version: u8,
    },
    /// A node started with an unknown tag byte.
    #[error("unknown node tag {tag:#04x}")]
    UnknownNodeTag {
        /// The offending tag byte.
        tag: u8,
    },
    /// The stream ended in the middle of a value.
    #[error("tree encoding truncated while reading {context}")]
    Truncated {
        /// What was being read.
        context: &'static str,
    },
    /// A label was not valid UTF-8.
    #[error("tree label is not valid UTF-8")]
    InvalidLabel,
    /// A phrase node declared no children.
    #[error("phrase node '{label}' has no children")]
    EmptyPhrase {
        /// Label of the empty phrase.
        label: String,
    },
    /// Nesting exceeded the decoder's depth limit.
    #[error("tree nesting exceeds {limit} levels")]
    TooDeep {
        /// The depth limit.
        limit: usize,
    },
    /// Bytes remained after the root node.
    #[error("{count} trailing bytes after tree")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },
}
