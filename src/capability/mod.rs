//! External capabilities the build pipeline depends on
//!
//! Network transfer, archive expansion and bulk copying sit behind small
//! traits so the materializer and layering engine can be driven by fakes in
//! tests. Each trait has one production implementation:
//!
//! - [`Fetch`]: [`fetch::HttpFetcher`] (blocking reqwest, resumable)
//! - [`Expand`]: [`expand::NativeExpander`] (zip crate, `/extract:` for installers)
//! - [`BulkCopy`]: [`mirror::MirrorCopy`] (walkdir, incremental)

pub mod expand;
pub mod fetch;
pub mod mirror;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ui::ProgressReporter;

/// Download a URL to a local file
pub trait Fetch {
    /// Fetch `url` into `dest`, returning the final size in bytes.
    ///
    /// Implementations own retries and timeouts; an error means every attempt
    /// failed.
    fn fetch(&self, url: &str, dest: &Path, progress: &mut dyn ProgressReporter) -> Result<u64>;
}

/// Expand update payloads into a folder
pub trait Expand {
    /// Expand `payload` (archive, self-extracting installer or plain file) into `target`
    fn expand(&self, payload: &Path, target: &Path) -> Result<()>;

    /// Unpack a zip-wrapped download into `work_dir` and return the installer inside it
    fn unwrap_zip(&self, archive: &Path, work_dir: &Path) -> Result<PathBuf>;
}

/// Result of a mirror copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Copy a directory tree, leaving up-to-date files alone
pub trait BulkCopy {
    fn mirror(&self, src: &Path, dst: &Path) -> Result<CopyStats>;
}

/// The capability set handed to the build pipeline
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    pub fetch: &'a dyn Fetch,
    pub expand: &'a dyn Expand,
    pub copy: &'a dyn BulkCopy,
}
