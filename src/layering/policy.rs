//! "Already slipstreamed" detection
//!
//! Service packs are only layered onto an `Updates` folder that does not carry
//! them yet. The default policy counts patch files against the threshold the
//! catalog declares on the service pack.

use std::path::Path;

use crate::catalog::UpdatePackage;
use crate::common::fs::files_matching;

/// Patch files counted by [`PatchCountPolicy`]
pub const PATCH_PATTERN: &str = "*.msp";

/// Decides whether a service pack can be skipped for an `Updates` folder
pub trait SlipstreamPolicy {
    /// `Some(reason)` when `updates_dir` already carries `service_pack`
    fn already_slipstreamed(&self, updates_dir: &Path, service_pack: &UpdatePackage) -> Option<String>;
}

/// Counts `*.msp` files against the service pack's `min_patch_files`
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchCountPolicy;

impl PatchCountPolicy {
    pub fn count_patches(updates_dir: &Path) -> usize {
        files_matching(updates_dir, PATCH_PATTERN).len()
    }
}

impl SlipstreamPolicy for PatchCountPolicy {
    fn already_slipstreamed(&self, updates_dir: &Path, service_pack: &UpdatePackage) -> Option<String> {
        let threshold = service_pack.min_patch_files?;
        let count = Self::count_patches(updates_dir);
        (count >= threshold).then(|| {
            format!("Updates already holds {count} patch files (threshold {threshold})")
        })
    }
}
