//! Incremental directory mirroring

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::{BulkCopy, CopyStats};
use crate::common::fs::{copy_file, ensure_dir};
use crate::error::{self, Result};

/// Copies files that are missing or older at the destination
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorCopy;

impl BulkCopy for MirrorCopy {
    fn mirror(&self, src: &Path, dst: &Path) -> Result<CopyStats> {
        ensure_dir(dst)?;
        let mut stats = CopyStats::default();

        for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| {
                error::fs::copy_failed(src, dst, format!("failed to walk source tree: {e}"))
            })?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| error::fs::copy_failed(entry.path(), dst, e.to_string()))?;
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                ensure_dir(&target)?;
                continue;
            }

            if is_up_to_date(entry.path(), &target) {
                stats.skipped += 1;
            } else {
                copy_file(entry.path(), &target)?;
                stats.copied += 1;
            }
        }

        Ok(stats)
    }
}

/// Destination exists and is not older than the source
fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let (Ok(src_meta), Ok(dst_meta)) = (fs::metadata(src), fs::metadata(dst)) else {
        return false;
    };
    match (src_meta.modified(), dst_meta.modified()) {
        (Ok(src_time), Ok(dst_time)) => dst_time >= src_time,
        _ => false,
    }
}
