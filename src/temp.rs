//! Temporary locations
//!
//! Work directories for unwrapped downloads must never land under the current
//! working directory (e.g. when TMPDIR=tmp), and the update extractor writes
//! its logs to the same temp folder we read them back from.

use std::env;
use std::path::PathBuf;

/// Absolute directory to create temporary work directories in
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        return t;
    }

    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map_or_else(|_| PathBuf::from("C:\\Windows\\Temp"), PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}

/// Folder the update extractor leaves `opatchinstall*.log` files in
pub fn extraction_log_dir() -> PathBuf {
    temp_dir_base()
}
