//! Error types for manhattan-core
//!
//! Only configuration and parsing paths can fail. Projection, hit lookup and
//! label layout filter bad records instead of returning errors.

use thiserror::Error;

/// Result type for fallible core operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors raised while building scales or parsing locus strings
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid reference table: {0}")]
    InvalidReference(String),

    #[error("Invalid p-value scale: {0}")]
    InvalidScale(String),

    #[error("Invalid variant ID '{0}'. Expected chr-pos-ref-alt")]
    InvalidVariantId(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Unknown contig: {0}")]
    UnknownContig(String),
}

impl LayoutError {
    pub fn invalid_reference<S: Into<String>>(message: S) -> Self {
        Self::InvalidReference(message.into())
    }

    pub fn invalid_scale<S: Into<String>>(message: S) -> Self {
        Self::InvalidScale(message.into())
    }

    pub fn invalid_interval<S: Into<String>>(message: S) -> Self {
        Self::InvalidInterval(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::invalid_reference("no chromosomes");
        assert_eq!(err.to_string(), "Invalid reference table: no chromosomes");

        let err = LayoutError::InvalidVariantId("chr1-abc".to_string());
        assert!(err.to_string().contains("chr-pos-ref-alt"));
    }
}
