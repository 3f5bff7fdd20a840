//! Error types for netlocal

use thiserror::Error;

/// Main error type for netlocal operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Length mismatch: expected {expected} {what}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid colormap: {0}")]
    InvalidColormap(String),
    
    #[error("Render error: {0}")]
    Render(String),
    
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for netlocal operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::LengthMismatch`] if `actual` differs from `expected`
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::LengthMismatch { what, expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(Error::check_len("sizes", 3, 3).is_ok());

        let err = Error::check_len("labels", 5, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch { what: "labels", expected: 5, actual: 4 }
        ));
        assert_eq!(err.to_string(), "Length mismatch: expected 5 labels, got 4");
    }
}
