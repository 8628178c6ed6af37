//! Error types for the extraction worker

use distill_domain::ErrorKind;
use thiserror::Error;

/// Errors that can occur while extracting one document
///
/// Each variant maps onto exactly one [`ErrorKind`] so the worker can turn any
/// failure into a typed outcome without losing the underlying message.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document could not be read
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider call exceeded the deadline
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// Provider returned a malformed or schema-violating record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Any other failure from the extraction call
    #[error("Extraction error: {0}")]
    Provider(String),
}

impl ExtractorError {
    /// Classification used for outcomes and error records
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractorError::Io(_) => ErrorKind::Io,
            ExtractorError::Timeout(_) => ErrorKind::Timeout,
            ExtractorError::InvalidRecord(_) => ErrorKind::Validation,
            ExtractorError::Provider(_) => ErrorKind::Extraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ExtractorError::Timeout(5).kind(), ErrorKind::Timeout);
        assert_eq!(
            ExtractorError::InvalidRecord("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ExtractorError::Provider("x".into()).kind(),
            ErrorKind::Extraction
        );
    }
}
