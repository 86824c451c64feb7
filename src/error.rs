//! Error types for the boundary operations.
//!
//! The filtering and aggregation pipeline never fails. Errors only come from reading
//! files, decoding CSV framing or a roster document, and driving the terminal.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Invalid roster file {path}: {source}")]
    Roster {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_error_message_names_line() {
        let err = Error::Csv { line: 7, message: "unterminated quoted field".to_string() };
        assert_eq!(err.to_string(), "Malformed CSV at line 7: unterminated quoted field");
    }
}
