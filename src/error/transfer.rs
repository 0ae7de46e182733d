//! Download and expansion errors

use super::SlipstreamError;

/// Creates a fetch failed error
pub fn fetch_failed(url: impl Into<String>, attempts: u32, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::FetchFailed {
        url: url.into(),
        attempts,
        reason: reason.into(),
    }
}

/// Creates an extraction failed error
pub fn extraction_failed(package: impl Into<String>, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::ExtractionFailed {
        package: package.into(),
        reason: reason.into(),
        log: None,
    }
}

/// Creates an extraction failed error pointing at the tool's log file
pub fn extraction_failed_with_log(
    package: impl Into<String>,
    reason: impl Into<String>,
    log: &std::path::Path,
) -> SlipstreamError {
    SlipstreamError::ExtractionFailed {
        package: package.into(),
        reason: reason.into(),
        log: Some(log.display().to_string()),
    }
}
