//! Error handling for the InvoiceAI client

use std::fmt;
use thiserror::Error;

/// Unified error type for the InvoiceAI client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// File read errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication errors, including credential validation performed
    /// before the gateway is contacted
    #[error("authentication error: {0}")]
    Auth(String),

    /// No usable access token is available for an authenticated call
    #[error("not signed in")]
    Unauthenticated,

    /// The file's media type is not accepted for processing
    #[error("file type not supported: {0}")]
    UnsupportedFileType(String),

    /// The inference endpoint answered with a non-success status
    #[error("upload rejected with status {status}: {message}")]
    UploadRejected { status: u16, message: String },

    /// A second upload was started while one is still in flight
    #[error("an upload is already in progress")]
    UploadInProgress,

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
