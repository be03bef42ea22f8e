//! Error types for wgutil
//!
//! Absent elements and keys are not errors: sequence and mapping lookups
//! return `Option` for those. The variants here cover bound violations,
//! failed host lookups, malformed printed forms and file I/O.

use std::io;
use thiserror::Error;

/// Result type alias for wgutil operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Index or numeric bound violation
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A named object (buffer, frame) could not be found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed printed form
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// A well-formed value that does not have the expected shape
    #[error("Unexpected form: expected {expected}, got {found}")]
    Shape { expected: String, found: String },

    /// I/O error while reading or writing a form
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }

    pub fn shape(expected: impl Into<String>, found: impl std::fmt::Display) -> Self {
        Error::Shape {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_out_of_range() {
        let err = Error::out_of_range("index 7 for length 3");
        assert_eq!(err.to_string(), "Out of range: index 7 for length 3");
    }

    #[test]
    fn test_error_display_parse() {
        let err = Error::Parse {
            line: 2,
            column: 5,
            message: "Unclosed parenthesis".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error at 2:5: Unclosed parenthesis");
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }
}
