//! Error types for examsplit.

use std::io;
use thiserror::Error;

/// Result type alias for examsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during segmentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document could not be opened or parsed.
    #[error("Document read error: {0}")]
    DocumentRead(String),

    /// No question labels were found, so there is nothing to segment.
    #[error("No question labels found in document")]
    InsufficientData,

    /// A question label's captured value did not parse as a number.
    #[error("Malformed question label {value:?} on page {page}")]
    MalformedLabel {
        /// The captured value that failed to parse
        value: String,
        /// Zero-based page index of the offending label
        page: usize,
    },

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Error serializing segmentation output.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::DocumentRead(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InsufficientData;
        assert_eq!(err.to_string(), "No question labels found in document");

        let err = Error::MalformedLabel {
            value: "IX".to_string(),
            page: 3,
        };
        assert_eq!(err.to_string(), "Malformed question label \"IX\" on page 3");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
