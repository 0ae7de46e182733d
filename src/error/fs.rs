//! File system errors

use std::path::Path;

use super::SlipstreamError;

/// Creates a directory creation error
pub fn create_dir_failed(path: &Path, err: &std::io::Error) -> SlipstreamError {
    SlipstreamError::DirectoryCreateFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a file copy error
pub fn copy_failed(from: &Path, to: &Path, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::FileCopyFailed {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates a file write error
pub fn write_failed(path: &Path, err: &std::io::Error) -> SlipstreamError {
    SlipstreamError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a read-only attribute clearing error
pub fn attribute_clear_failed(path: &Path, reason: impl Into<String>) -> SlipstreamError {
    SlipstreamError::AttributeClearFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SlipstreamError {
    SlipstreamError::IoError {
        message: message.into(),
    }
}
