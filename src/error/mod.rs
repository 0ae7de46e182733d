//! Error types and handling for slipstream
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`catalog`]: Catalog loading and validation errors
//! - [`source`]: Base media detection errors
//! - [`selection`]: Invalid update or language selections
//! - [`transfer`]: Download and expansion errors
//! - [`fs`]: File system errors

#![allow(dead_code, unused_assignments)]

pub mod catalog;
pub mod fs;
pub mod selection;
pub mod source;
pub mod transfer;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for slipstream operations
#[derive(Error, Diagnostic, Debug)]
pub enum SlipstreamError {
    // Catalog errors
    #[error("Catalog not found: {path}")]
    #[diagnostic(
        code(slipstream::catalog::not_found),
        help("Place catalog.yaml next to the slipstream executable or pass --catalog <PATH>")
    )]
    CatalogNotFound { path: String },

    #[error("Failed to parse catalog {path}: {reason}")]
    #[diagnostic(code(slipstream::catalog::parse_failed))]
    CatalogParseFailed { path: String, reason: String },

    #[error("Invalid catalog: {message}")]
    #[diagnostic(code(slipstream::catalog::invalid))]
    CatalogInvalid { message: String },

    // Source media errors
    #[error("No SharePoint installation media found (searched: {searched})")]
    #[diagnostic(
        code(slipstream::source::not_found),
        help(
            "Pass --source pointing at a folder that contains setup.exe and PrerequisiteInstaller.exe, or mount the installation media"
        )
    )]
    SourceNotFound { searched: String },

    #[error("Office Web Apps media not found at: {path}")]
    #[diagnostic(
        code(slipstream::source::owa_not_found),
        help("The --owa-source folder must contain setup.exe")
    )]
    OwaSourceNotFound { path: String },

    #[error("Failed to read version information from {path}: {reason}")]
    #[diagnostic(code(slipstream::source::version_unreadable))]
    VersionUnreadable { path: String, reason: String },

    #[error("Unsupported product version: {version}")]
    #[diagnostic(
        code(slipstream::source::unsupported_version),
        help("Run 'slipstream list' to see which products the catalog knows about")
    )]
    UnsupportedVersion { version: String },

    // Selection errors
    #[error("Cumulative update '{name}' is not available for {product}")]
    #[diagnostic(code(slipstream::selection::invalid_cumulative_update))]
    InvalidCumulativeUpdate { name: String, product: String },

    #[error("Language '{culture}' is not available for {product}")]
    #[diagnostic(code(slipstream::selection::invalid_language))]
    InvalidLanguage { culture: String, product: String },

    #[error("Unknown product: {key}")]
    #[diagnostic(code(slipstream::selection::unknown_product))]
    UnknownProduct { key: String },

    // Transfer errors
    #[error("Failed to download {url} after {attempts} attempt(s): {reason}")]
    #[diagnostic(
        code(slipstream::transfer::fetch_failed),
        help("Check network connectivity and re-run; completed downloads are kept")
    )]
    FetchFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Failed to expand {package}: {reason}")]
    #[diagnostic(code(slipstream::transfer::extraction_failed))]
    ExtractionFailed {
        package: String,
        reason: String,
        log: Option<String>,
    },

    // File system errors
    #[error("Failed to create directory {path}: {reason}")]
    #[diagnostic(code(slipstream::fs::create_dir_failed))]
    DirectoryCreateFailed { path: String, reason: String },

    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(code(slipstream::fs::copy_failed))]
    FileCopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Failed to write file {path}: {reason}")]
    #[diagnostic(code(slipstream::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to clear read-only attribute under {path}: {reason}")]
    #[diagnostic(code(slipstream::fs::attribute_clear_failed))]
    AttributeClearFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(slipstream::fs::io_error))]
    IoError { message: String },
}

impl SlipstreamError {
    /// Whether the run may continue after this error has been recorded.
    ///
    /// Catalog and source errors abort before a plan exists; everything an
    /// individual artifact or folder can raise is recorded and skipped.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SlipstreamError::CatalogNotFound { .. }
                | SlipstreamError::CatalogParseFailed { .. }
                | SlipstreamError::CatalogInvalid { .. }
                | SlipstreamError::SourceNotFound { .. }
                | SlipstreamError::OwaSourceNotFound { .. }
                | SlipstreamError::VersionUnreadable { .. }
                | SlipstreamError::UnsupportedVersion { .. }
                | SlipstreamError::UnknownProduct { .. }
        )
    }

    /// Diagnostic log left behind by the failing tool, if any
    pub fn log_path(&self) -> Option<&str> {
        match self {
            SlipstreamError::ExtractionFailed { log, .. } => log.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SlipstreamError {
    fn from(err: std::io::Error) -> Self {
        SlipstreamError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SlipstreamError {
    fn from(err: serde_yaml::Error) -> Self {
        SlipstreamError::CatalogParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SlipstreamError {
    fn from(err: serde_json::Error) -> Self {
        SlipstreamError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SlipstreamError {
    fn from(err: reqwest::Error) -> Self {
        SlipstreamError::FetchFailed {
            url: err
                .url()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
            attempts: 1,
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for SlipstreamError {
    fn from(err: zip::result::ZipError) -> Self {
        SlipstreamError::ExtractionFailed {
            package: "zip archive".to_string(),
            reason: err.to_string(),
            log: None,
        }
    }
}

impl From<inquire::InquireError> for SlipstreamError {
    fn from(err: inquire::InquireError) -> Self {
        SlipstreamError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SlipstreamError>;
