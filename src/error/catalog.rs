//! Catalog errors

use super::SlipstreamError;

/// Creates a catalog not found error
pub fn not_found(path: impl Into<String>) -> SlipstreamError {
    SlipstreamError::CatalogNotFound { path: path.into() }
}

/// Creates a catalog parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::CatalogParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid catalog error
pub fn invalid(message: impl Into<String>) -> SlipstreamError {
    SlipstreamError::CatalogInvalid {
        message: message.into(),
    }
}
