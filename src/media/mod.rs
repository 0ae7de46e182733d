//! Installation media detection
//!
//! Finds the base SharePoint media, reads the product version from its
//! `setup.exe` and maps it to a catalog product. Also owns the default
//! destination and the year adjustment applied to it once the product is
//! known.

pub mod version;

use std::path::{Path, PathBuf};

#[cfg(not(windows))]
use walkdir::WalkDir;

use crate::catalog::{Catalog, Product};
use crate::common::fs::find_file_ignore_case;
use crate::error::{self, Result};
use version::{FileVersion, read_file_version};

/// Primary installer, carries the product version
pub const SETUP_EXE: &str = "setup.exe";

/// Second marker that tells server media apart from other Office media
pub const PREREQUISITE_INSTALLER: &str = "PrerequisiteInstaller.exe";

/// Year label the default destination ends in
pub const DEFAULT_YEAR: &str = "2010";

/// Base media that passed the marker check and mapped to a product
#[derive(Debug, Clone)]
pub struct ResolvedSource<'a> {
    pub path: PathBuf,
    pub version: FileVersion,
    pub product: &'a Product,
}

/// Locates base media and maps its version to a catalog product
pub struct VersionResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> VersionResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve the source tree and its product.
    ///
    /// The explicit candidate is tried first, then `roots` in order. The first
    /// folder holding both marker files wins.
    pub fn resolve(
        &self,
        explicit: Option<&Path>,
        roots: &[PathBuf],
    ) -> Result<ResolvedSource<'a>> {
        let candidates: Vec<PathBuf> = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(roots.iter().cloned())
            .collect();

        let source = candidates
            .iter()
            .find(|dir| is_product_media(dir))
            .ok_or_else(|| error::source::not_found(&candidates))?;

        self.identify(source)
    }

    /// Read the version of media already known to carry the markers
    pub fn identify(&self, source: &Path) -> Result<ResolvedSource<'a>> {
        let setup = find_file_ignore_case(source, SETUP_EXE)
            .ok_or_else(|| error::source::not_found(&[source.to_path_buf()]))?;
        let version = read_file_version(&setup)?;

        let product = self
            .catalog
            .lookup_product(&version.major.to_string())
            .ok_or_else(|| error::source::unsupported_version(version.to_string()))?;

        Ok(ResolvedSource {
            path: source.to_path_buf(),
            version,
            product,
        })
    }
}

/// Whether `dir` looks like SharePoint server media
pub fn is_product_media(dir: &Path) -> bool {
    dir.is_dir()
        && find_file_ignore_case(dir, SETUP_EXE).is_some()
        && find_file_ignore_case(dir, PREREQUISITE_INSTALLER).is_some()
}

/// Check the Office Web Apps media folder
pub fn validate_owa_source(path: &Path) -> Result<PathBuf> {
    if path.is_dir() && find_file_ignore_case(path, SETUP_EXE).is_some() {
        Ok(path.to_path_buf())
    } else {
        Err(error::source::owa_not_found(path.display().to_string()))
    }
}

/// Volume roots probed when no explicit source is given, in probe order
#[cfg(windows)]
pub fn candidate_roots() -> Vec<PathBuf> {
    (b'D'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", char::from(letter))))
        .filter(|root| root.is_dir())
        .collect()
}

/// Volume roots probed when no explicit source is given, in probe order
#[cfg(not(windows))]
pub fn candidate_roots() -> Vec<PathBuf> {
    // /media and /run/media nest mounts under a per-user folder
    let bases: [(&str, usize); 4] = [
        ("/media", 2),
        ("/run/media", 2),
        ("/mnt", 1),
        ("/Volumes", 1),
    ];

    let mut roots = Vec::new();
    for (base, depth) in bases {
        let mut found: Vec<PathBuf> = WalkDir::new(base)
            .min_depth(1)
            .max_depth(depth)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect();
        found.sort();
        roots.extend(found);
    }
    roots
}

/// Destination used when none is given
#[cfg(windows)]
pub fn default_destination() -> PathBuf {
    PathBuf::from("C:\\SP").join(DEFAULT_YEAR)
}

/// Destination used when none is given
#[cfg(not(windows))]
pub fn default_destination() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("SP")
        .join(DEFAULT_YEAR)
}

/// Swap a year-suffixed destination over to the detected product's year.
///
/// Returns `None` when the last component is not another product's year
/// label, in which case the destination is used unchanged.
pub fn adjust_destination(destination: &Path, product: &Product, year_labels: &[&str]) -> Option<PathBuf> {
    let last = destination.file_name()?.to_str()?;
    if last == product.year || !year_labels.contains(&last) {
        return None;
    }
    Some(destination.with_file_name(&product.year))
}
