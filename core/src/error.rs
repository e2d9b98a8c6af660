//! Error types for the Transifex API client.
//!
//! # Design
//! Validation failures (`MissingFile`, `InvalidFileType`, `InvalidArgument`)
//! are raised while a request is being built, before anything touches the
//! network. Every unexpected HTTP status lands in `Api` with the raw status
//! code and body.

use std::path::PathBuf;

/// Errors returned while building requests, executing them, or parsing
/// their responses.
#[derive(Debug, thiserror::Error)]
pub enum TransifexError {
    /// The file referenced as upload content does not exist.
    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// The content source selector is not supported, or both or neither of
    /// the inline and file sources were given.
    #[error("invalid content type: {0}")]
    InvalidFileType(String),

    /// A required argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered with a status other than the expected one.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The upload file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TransifexError {
    /// HTTP status carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransifexError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
