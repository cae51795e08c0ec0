//! Error types for the docatl CLI.
//!
//! This module defines semantic error variants covering the whole
//! command lifecycle: local input validation, archive I/O, metadata
//! decoding, and remote HTTP failures. Variants carry recovery hints
//! where applicable so the CLI can print actionable messages.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building, inspecting, or publishing
/// documentation artifacts.
#[derive(Debug, Error)]
pub enum DocatlError {
    /// A locally supplied argument was invalid (non-directory build
    /// source, missing upload file, unresolvable project or version).
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was wrong with the input.
        reason: String,
    },

    /// A local filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact archive could not be written or read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A metadata record was present but could not be decoded.
    #[error("metadata format error: {reason}")]
    Format {
        /// Description of the decode failure.
        reason: String,
    },

    /// The configuration file exists but could not be read or parsed.
    #[error("invalid config file {path}: {reason}")]
    Config {
        /// Path to the offending configuration file.
        path: Utf8PathBuf,
        /// Description of the parse or I/O failure.
        reason: String,
    },

    /// The server could not be reached at the transport level
    /// (connection refused, timeout, malformed URL).
    #[error("request to {url} failed: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the transport failure.
        reason: String,
    },

    /// The server was reachable but rejected the request with an
    /// unexpected status code. The body is the server's diagnostic,
    /// reproduced verbatim.
    #[error("server rejected the request (status code: {status}) {body}")]
    RemoteRejected {
        /// The HTTP status code the server returned.
        status: u16,
        /// The raw response body.
        body: String,
    },
}

impl DocatlError {
    /// Shorthand for an [`DocatlError::InvalidInput`] with a formatted reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`DocatlError`].
pub type Result<T> = std::result::Result<T, DocatlError>;
