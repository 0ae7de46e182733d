//! Common file system operations with unified error handling

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{self, Result};

/// Create a directory and its parents
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| error::fs::create_dir_failed(path, &e))
}

/// Make a single file or directory writable
pub fn clear_readonly(path: &Path) -> std::io::Result<bool> {
    let metadata = fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(false);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions)?;
    Ok(true)
}

/// Clear the read-only attribute on everything under `root`
///
/// Installer extraction refuses to overwrite read-only files, and media copied
/// from optical discs arrives read-only. Returns how many entries changed.
pub fn clear_readonly_recursive(root: &Path) -> Result<usize> {
    if !root.exists() {
        return Ok(0);
    }

    let mut cleared = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry =
            entry.map_err(|e| error::fs::attribute_clear_failed(root, e.to_string()))?;
        if clear_readonly(entry.path())
            .map_err(|e| error::fs::attribute_clear_failed(entry.path(), e.to_string()))?
        {
            cleared += 1;
        }
    }
    Ok(cleared)
}

/// Copy one file, replacing a read-only destination if needed
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    if dst.exists() {
        clear_readonly(dst).map_err(|e| error::fs::copy_failed(src, dst, e.to_string()))?;
    }
    fs::copy(src, dst).map_err(|e| error::fs::copy_failed(src, dst, e.to_string()))
}

/// Files directly inside `dir` whose lowercased name matches `pattern`
pub fn files_matching(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let Ok(glob) = Glob::new(pattern) else {
        return Vec::new();
    };

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            glob.matched(&CandidatePath::from(name.as_str())).is_some()
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Files directly inside `dir` whose name contains `needle`, ignoring case
pub fn files_containing(dir: &Path, needle: &str) -> Vec<PathBuf> {
    let needle = needle.to_lowercase();
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    found.sort();
    found
}

/// Find `name` inside `dir`, ignoring ASCII case
///
/// Installation media is authored on Windows, so `Setup.exe` and `setup.exe`
/// are the same file even when the tree sits on a case-sensitive volume.
pub fn find_file_ignore_case(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Some(exact);
    }

    fs::read_dir(dir)
        .ok()?
        .filter_map(std::result::Result::ok)
        .find(|entry| {
            entry.file_name().to_string_lossy().eq_ignore_ascii_case(name)
                && entry.path().is_file()
        })
        .map(|entry| entry.path())
}
