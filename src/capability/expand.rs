//! Payload expansion
//!
//! Three payload shapes turn up in the catalog:
//!
//! - `.zip` archives, unpacked with the `zip` crate
//! - self-extracting update executables, which accept `/extract:<dir>`
//! - everything else (`.msi`, `.msu`, `.cab`), copied into place as-is

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use super::Expand;
use crate::common::fs::{copy_file, ensure_dir};
use crate::error::{self, Result};

/// How much UI the update executables show while extracting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractUi {
    /// No UI at all
    #[default]
    Quiet,
    /// Progress window without prompts
    Passive,
}

impl ExtractUi {
    fn switch(self) -> &'static str {
        match self {
            ExtractUi::Quiet => "/quiet",
            ExtractUi::Passive => "/passive",
        }
    }
}

/// Production [`Expand`] implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeExpander {
    ui: ExtractUi,
}

impl NativeExpander {
    pub fn new(ui: ExtractUi) -> Self {
        Self { ui }
    }

    fn run_extractor(&self, exe: &Path, target: &Path) -> Result<()> {
        let package = display_name(exe);

        #[cfg(windows)]
        let status = Command::new(exe)
            .raw_arg(format!("/extract:\"{}\" {}", target.display(), self.ui.switch()))
            .status();

        #[cfg(not(windows))]
        let status = Command::new(exe)
            .arg(format!("/extract:{}", target.display()))
            .arg(self.ui.switch())
            .status();

        let status = status
            .map_err(|e| error::transfer::extraction_failed(&package, format!("failed to start: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(error::transfer::extraction_failed(
                package,
                format!("extractor exited with {status}"),
            ))
        }
    }
}

impl Expand for NativeExpander {
    fn expand(&self, payload: &Path, target: &Path) -> Result<()> {
        ensure_dir(target)?;

        match extension_of(payload).as_str() {
            "zip" => extract_zip(payload, target).map(|_| ()),
            "exe" => self.run_extractor(payload, target),
            _ => {
                let name = payload
                    .file_name()
                    .ok_or_else(|| error::transfer::extraction_failed(display_name(payload), "payload has no file name"))?;
                copy_file(payload, &target.join(name)).map(|_| ())
            }
        }
    }

    fn unwrap_zip(&self, archive: &Path, work_dir: &Path) -> Result<PathBuf> {
        let files = extract_zip(archive, work_dir)?;
        files
            .iter()
            .find(|f| extension_of(f) == "exe")
            .or_else(|| files.first())
            .cloned()
            .ok_or_else(|| {
                error::transfer::extraction_failed(display_name(archive), "archive is empty")
            })
    }
}

/// Unpack every file of a zip archive into `target`, returning the written paths
pub fn extract_zip(archive: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let package = display_name(archive);
    let file = File::open(archive)
        .map_err(|e| error::transfer::extraction_failed(&package, e.to_string()))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| error::transfer::extraction_failed(&package, e.to_string()))?;

    let mut written = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| error::transfer::extraction_failed(&package, e.to_string()))?;

        // Entries escaping the target (`../`, absolute paths) are dropped
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out = target.join(relative);

        if entry.is_dir() {
            ensure_dir(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            ensure_dir(parent)?;
        }

        let mut outfile = File::create(&out).map_err(|e| error::fs::write_failed(&out, &e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| error::fs::write_failed(&out, &e))?;
        written.push(out);
    }

    Ok(written)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}
