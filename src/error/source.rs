//! Installation media errors

use super::SlipstreamError;

/// Creates a source not found error listing every location that was probed
pub fn not_found(searched: &[std::path::PathBuf]) -> SlipstreamError {
    let searched = if searched.is_empty() {
        "no candidate locations".to_string()
    } else {
        searched
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    SlipstreamError::SourceNotFound { searched }
}

/// Creates an Office Web Apps source not found error
pub fn owa_not_found(path: impl Into<String>) -> SlipstreamError {
    SlipstreamError::OwaSourceNotFound { path: path.into() }
}

/// Creates a version unreadable error
pub fn version_unreadable(path: impl Into<String>, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::VersionUnreadable {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an unsupported version error
pub fn unsupported_version(version: impl Into<String>) -> SlipstreamError {
    SlipstreamError::UnsupportedVersion {
        version: version.into(),
    }
}
