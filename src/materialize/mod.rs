//! Artifact materialization
//!
//! Gets one update package from "listed in the catalog" to "expanded in its
//! destination folder", doing as little as possible:
//!
//! 1. the expected file already sits in the destination folder: done
//! 2. the download already sits in staging: reuse it (renamed to `.zip` when
//!    it is a zip disguised as an executable)
//! 3. the renamed archive already sits in staging: reuse it
//! 4. otherwise fetch it
//!
//! Zip-wrapped downloads are unpacked into a throwaway work directory first to
//! get at the real installer, then the installer is expanded into the
//! destination folder and its extraction log is checked. Plain `.zip`
//! downloads are unpacked straight into the destination folder. Either way the
//! expected file has to show up there afterwards.

pub mod log;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

use crate::capability::Capabilities;
use crate::catalog::UpdatePackage;
use crate::common::fs::{clear_readonly_recursive, copy_file, ensure_dir, find_file_ignore_case};
use crate::context::RunContext;
use crate::error::{self, Result};

/// What the presence checks found for one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactState {
    pub already_extracted: bool,
    pub already_downloaded: bool,
    /// Download in staging to expand, if one is there
    pub local_archive_path: Option<PathBuf>,
    /// File proving the package is in place
    pub expanded_path: Option<PathBuf>,
}

/// Outcome of [`Materializer::materialize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    /// Expected file in the destination folder, or the folder itself
    pub path: PathBuf,
    pub fetched: bool,
    pub expanded: bool,
}

impl Materialized {
    pub fn was_already_present(&self) -> bool {
        !self.fetched && !self.expanded
    }
}

pub struct Materializer<'a> {
    caps: Capabilities<'a>,
    log_dir: PathBuf,
}

impl<'a> Materializer<'a> {
    pub fn new(caps: Capabilities<'a>) -> Self {
        Self {
            caps,
            log_dir: crate::temp::extraction_log_dir(),
        }
    }

    /// Look for extractor logs somewhere other than the temp folder
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Presence checks, first match wins
    pub fn inspect(&self, package: &UpdatePackage, destination: &Path, staging: &Path) -> ArtifactState {
        if let Some(expected) = package.expected_file() {
            if let Some(found) = find_file_ignore_case(destination, &expected) {
                return ArtifactState {
                    already_extracted: true,
                    expanded_path: Some(found),
                    ..ArtifactState::default()
                };
            }
        }

        let download = staging.join(package.file_name());
        if download.is_file() {
            return ArtifactState {
                already_downloaded: true,
                local_archive_path: Some(download),
                ..ArtifactState::default()
            };
        }

        let archive = staging.join(package.archive_file_name());
        if package.is_zip_wrapped() && archive.is_file() {
            return ArtifactState {
                already_downloaded: true,
                local_archive_path: Some(archive),
                ..ArtifactState::default()
            };
        }

        ArtifactState::default()
    }

    /// Make `package` present in `destination`, using `staging` for downloads
    pub fn materialize(
        &self,
        package: &UpdatePackage,
        destination: &Path,
        staging: &Path,
        ctx: &mut RunContext,
    ) -> Result<Materialized> {
        ensure_dir(destination)?;
        let state = self.inspect(package, destination, staging);

        if state.already_extracted {
            let path = state.expanded_path.unwrap_or_else(|| destination.to_path_buf());
            ctx.detail(&format!("{} already present at {}", package.name, path.display()));
            return Ok(Materialized {
                path,
                fetched: false,
                expanded: false,
            });
        }

        if package.is_plain_download() {
            return self.place_plain_download(package, destination, state, ctx);
        }

        let (local, fetched) = match state.local_archive_path {
            Some(local) => {
                ctx.detail(&format!("Using {} from staging", local.display()));
                (local, false)
            }
            None => {
                ensure_dir(staging)?;
                let download = staging.join(package.file_name());
                ctx.info(&format!("Downloading {} ({})", package.name, package.url));
                self.caps.fetch.fetch(&package.url, &download, ctx.progress())?;
                ctx.report.downloads += 1;
                (download, true)
            }
        };

        let local = self.normalize_archive_name(package, &local)?;
        self.expand_into(package, &local, destination, ctx)?;

        let path = match package.expected_file() {
            Some(expected) => find_file_ignore_case(destination, &expected).ok_or_else(|| {
                error::transfer::extraction_failed(
                    &package.name,
                    format!("{expected} not found in {} after expansion", destination.display()),
                )
            })?,
            None => destination.to_path_buf(),
        };
        Ok(Materialized {
            path,
            fetched,
            expanded: true,
        })
    }

    /// Plain downloads are used as-is: fetched straight into the destination folder
    fn place_plain_download(
        &self,
        package: &UpdatePackage,
        destination: &Path,
        state: ArtifactState,
        ctx: &mut RunContext,
    ) -> Result<Materialized> {
        let target = destination.join(package.file_name());

        if let Some(staged) = state.local_archive_path {
            copy_file(&staged, &target)?;
            return Ok(Materialized {
                path: target,
                fetched: false,
                expanded: false,
            });
        }

        ctx.info(&format!("Downloading {} ({})", package.name, package.url));
        self.caps.fetch.fetch(&package.url, &target, ctx.progress())?;
        ctx.report.downloads += 1;
        Ok(Materialized {
            path: target,
            fetched: true,
            expanded: false,
        })
    }

    /// Give zip-wrapped executables a `.zip` name so they are treated as archives
    fn normalize_archive_name(&self, package: &UpdatePackage, local: &Path) -> Result<PathBuf> {
        if !package.is_zip_wrapped() {
            return Ok(local.to_path_buf());
        }
        let is_zip = local
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            return Ok(local.to_path_buf());
        }

        let renamed = local.with_file_name(package.archive_file_name());
        fs::rename(local, &renamed)
            .map_err(|e| error::fs::copy_failed(local, &renamed, e.to_string()))?;
        Ok(renamed)
    }

    fn expand_into(
        &self,
        package: &UpdatePackage,
        local: &Path,
        destination: &Path,
        ctx: &mut RunContext,
    ) -> Result<()> {
        // Keeps the unwrapped installer alive until expansion finishes
        let mut work_dir: Option<TempDir> = None;
        let payload = if package.is_zip_wrapped() {
            let work = TempDir::new_in(crate::temp::temp_dir_base())
                .map_err(|e| error::fs::io_error(format!("Failed to create work directory: {e}")))?;
            let inner = self.caps.expand.unwrap_zip(local, work.path())?;
            ctx.detail(&format!("Unwrapped {}", inner.display()));
            work_dir = Some(work);
            inner
        } else {
            local.to_path_buf()
        };

        let cleared = clear_readonly_recursive(destination)?;
        if cleared > 0 {
            ctx.detail(&format!("Cleared read-only attribute on {cleared} entries"));
        }

        ctx.info(&format!("Expanding {} into {}", package.name, destination.display()));
        let started = SystemTime::now();
        self.caps.expand.expand(&payload, destination)?;
        ctx.report.expansions += 1;

        let is_executable = payload
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
        if is_executable {
            log::check_extraction_log(&self.log_dir, started, &package.name)?;
        }

        drop(work_dir);
        Ok(())
    }
}
