//! Selection errors
//!
//! These never abort a run; the selection resolver records them and moves on.

use super::SlipstreamError;

/// Creates an invalid cumulative update error
pub fn invalid_cumulative_update(
    name: impl Into<String>,
    product: impl Into<String>,
) -> SlipstreamError {
    SlipstreamError::InvalidCumulativeUpdate {
        name: name.into(),
        product: product.into(),
    }
}

/// Creates an invalid language error
pub fn invalid_language(culture: impl Into<String>, product: impl Into<String>) -> SlipstreamError {
    SlipstreamError::InvalidLanguage {
        culture: culture.into(),
        product: product.into(),
    }
}

/// Creates an unknown product error
pub fn unknown_product(key: impl Into<String>) -> SlipstreamError {
    SlipstreamError::UnknownProduct { key: key.into() }
}
