//! Error types for canvasmark.
//!
//! The conversion pipelines themselves are total and never fail. These
//! errors only come from the file and byte helpers that sit in front of them.

use std::io;
use thiserror::Error;

/// Result type alias for canvasmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading content for conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input bytes are not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The source format could not be determined.
    #[error("Unknown source format: neither HTML nor Markdown could be detected")]
    UnknownFormat,
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
