//! Extraction log inspection
//!
//! Update executables run with `/extract:` exit with success even when they
//! could not write the files, but they leave an `opatchinstall*.log` in the
//! temp folder that says so.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::common::fs::files_matching;
use crate::error::{self, Result};

/// Log files written by the update extractor
pub const LOG_PATTERN: &str = "opatchinstall*.log";

/// Lines that mark a failed extraction (matched case-insensitively)
pub const FAILURE_MARKERS: &[&str] = &["extraction failure", "failed to extract"];

// Coarse file systems round modification times
const MTIME_SLACK: Duration = Duration::from_secs(2);

/// Newest extractor log in `dir` modified at or after `since`
pub fn newest_log_since(dir: &Path, since: SystemTime) -> Option<PathBuf> {
    let since = since.checked_sub(MTIME_SLACK).unwrap_or(since);

    files_matching(dir, LOG_PATTERN)
        .into_iter()
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            (modified >= since).then_some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Fail when the newest log since `since` reports an extraction failure
pub fn check_extraction_log(dir: &Path, since: SystemTime, package: &str) -> Result<()> {
    match newest_log_since(dir, since) {
        Some(log) => inspect_log(&log, package),
        None => Ok(()),
    }
}

/// Fail when `log` reports an extraction failure or cannot be read
pub fn inspect_log(log: &Path, package: &str) -> Result<()> {
    // Logs are UTF-16 on some builds; lossy decoding after dropping NULs covers both
    let bytes = fs::read(log).map_err(|e| {
        error::transfer::extraction_failed_with_log(package, format!("extractor log unreadable: {e}"), log)
    })?;
    let text: String = String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|c| *c != '\0')
        .collect::<String>()
        .to_lowercase();

    match FAILURE_MARKERS.iter().find(|marker| text.contains(*marker)) {
        Some(marker) => Err(error::transfer::extraction_failed_with_log(
            package,
            format!("extractor log reports '{marker}'"),
            log,
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlipstreamError;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_no_log_is_success() {
        let temp = create_temp_dir();
        check_extraction_log(temp.path(), SystemTime::UNIX_EPOCH, "sp1").unwrap();
    }

    #[test]
    fn test_failure_marker_reports_log_path() {
        let temp = create_temp_dir();
        let log = temp.path().join("opatchinstall(3).log");
        fs::write(&log, "OPatchInstall: Extraction failure\r\n").unwrap();

        let err = check_extraction_log(temp.path(), SystemTime::UNIX_EPOCH, "SP1").unwrap_err();

        assert!(matches!(err, SlipstreamError::ExtractionFailed { .. }));
        assert_eq!(err.log_path(), Some(log.display().to_string().as_str()));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_utf16_log_is_understood() {
        let temp = create_temp_dir();
        let utf16: Vec<u8> = "Failed to extract all files"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        fs::write(temp.path().join("OPatchInstall.log"), utf16).unwrap();

        assert!(check_extraction_log(temp.path(), SystemTime::UNIX_EPOCH, "CU").is_err());
    }

    #[test]
    fn test_clean_log_is_success() {
        let temp = create_temp_dir();
        fs::write(
            temp.path().join("opatchinstall.log"),
            "OPatchInstall: Extraction completed\r\n",
        )
        .unwrap();
        check_extraction_log(temp.path(), SystemTime::UNIX_EPOCH, "CU").unwrap();
    }

    #[test]
    fn test_unreadable_log_is_a_failure() {
        let temp = create_temp_dir();
        let log = temp.path().join("opatchinstall.log");

        let err = inspect_log(&log, "CU").unwrap_err();

        assert!(matches!(err, SlipstreamError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("extractor log unreadable"), "got: {err}");
        assert_eq!(err.log_path(), Some(log.display().to_string().as_str()));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_logs_from_earlier_runs_are_ignored() {
        let temp = create_temp_dir();
        fs::write(temp.path().join("opatchinstall.log"), "Extraction failure").unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);

        assert!(newest_log_since(temp.path(), later).is_none());
        check_extraction_log(temp.path(), later, "CU").unwrap();
    }

    #[test]
    fn test_unrelated_logs_are_ignored() {
        let temp = create_temp_dir();
        fs::write(temp.path().join("setup.log"), "Extraction failure").unwrap();
        assert!(newest_log_since(temp.path(), SystemTime::UNIX_EPOCH).is_none());
    }
}
