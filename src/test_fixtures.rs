//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides the sample catalog, fake installation media and fake
//! capabilities the unit tests share.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{FakeExpander, FakeFetcher, create_temp_dir, sample_catalog};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let catalog = sample_catalog();
//!     let fetcher = FakeFetcher::default();
//!     let expander = sample_expander();
//! }
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::capability::{Capabilities, Expand, Fetch};
use crate::capability::mirror::MirrorCopy;
use crate::catalog::{Catalog, Product};
use crate::context::RunContext;
use crate::error::{self, Result};
use crate::media::version::FileVersion;
use crate::plan::prompt::CumulativeUpdatePrompt;
use crate::report::BuildReport;
use crate::ui::{ProgressReporter, SilentProgressReporter};

/// Catalog covering SharePoint 2010 and 2013 used across the unit tests
pub const SAMPLE_CATALOG: &str = r"
# Test catalog: SharePoint 2010 and 2013
products:
  - key: SP2010
    year: 2010
    version_prefix: 14
    prerequisites:
      - name: SQL Server 2008 R2 Native Client
        url: https://download.example.com/sp2010/sqlncli.msi
      - name: Windows Server AppFabric
        url: https://download.example.com/sp2010/WindowsServerAppFabricSetup_x64_6.1.exe
    service_packs:
      - name: SP1
        url: https://download.example.com/sp2010/officeserver2010sp1-kb2460045-x64-fullfile-en-us.exe
        expanded_file: oserversp1-x-none.msp
        min_patch_files: 46
    cumulative_updates:
      - name: April 2013
        url: https://download.example.com/sp2010/2760791_intl_x64_zip.exe
        expanded_file: ubersrv-kb2760791.msp
        service_pack: SP1
      - name: June 2013
        url: https://download.example.com/sp2010/ubersrv2010-kb2817527-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2817527.msp
        service_pack: SP1
    language_packs:
      - culture: fr-fr
        url: https://download.example.com/sp2010/fr-fr/ServerLanguagePack.exe
        expanded_file: setup.exe
        service_packs:
          - name: SP1
            url: https://download.example.com/sp2010/fr-fr/serverlanguagepack2010sp1-kb2460056-x64-fr-fr.exe
            expanded_file: wssmui-fr-fr-sp1.msp
      - culture: de-de
        url: https://download.example.com/sp2010/de-de/ServerLanguagePack.exe
        expanded_file: setup.exe
        cumulative_updates:
          - name: April 2013
            url: https://download.example.com/sp2010/de-de/ubersrvmui2010-kb2760791-x64-de-de.exe
            expanded_file: spsmui-de-de-kb2760791.msp
    office_web_apps:
      service_packs:
        - name: SP1
          url: https://download.example.com/sp2010/wacserver2010sp1-kb2460073-x64-fullfile-en-us.exe
          expanded_file: wacserversp1-x-none.msp
          min_patch_files: 20
      cumulative_updates:
        - name: April 2013
          url: https://download.example.com/sp2010/wacserver2010-kb2760794-fullfile-x64-glb.exe
          expanded_file: wacserver-kb2760794.msp

  - key: SP2013
    year: 2013
    version_prefix: 15
    service_packs:
      - name: SP1
        url: https://download.example.com/sp2013/officeserversp2013-kb2880552-fullfile-x64-en-us.exe
        expanded_file: oserversp1-x-none.msp
        min_patch_files: 60
    cumulative_updates:
      - name: March 2013
        url: https://download.example.com/sp2013/ubersrv2013-kb2767999-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2767999.msp
      - name: April 2013
        url: https://download.example.com/sp2013/ubersrv2013-kb2760355-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2760355.msp
      - name: June 2013
        url: https://download.example.com/sp2013/ubersrv2013-kb2817616-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2817616.msp
";

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Parse [`SAMPLE_CATALOG`]
///
/// # Panics
///
/// Panics if the sample catalog stops validating.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::from_yaml(SAMPLE_CATALOG).expect("sample catalog is valid")
}

/// Create test files under `root` from (relative path, content) pairs
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Bytes of a minimal executable whose version resource reports `version`
#[must_use]
pub fn fake_installer_image(version: FileVersion) -> Vec<u8> {
    let mut image = vec![b'M', b'Z'];
    image.resize(0x40, 0);
    for unit in "VS_VERSION_INFO".encode_utf16() {
        image.extend_from_slice(&unit.to_le_bytes());
    }
    image.extend_from_slice(&[0, 0, 0, 0]);
    image.extend_from_slice(&0xFEEF_04BD_u32.to_le_bytes());
    image.extend_from_slice(&0x0001_0000_u32.to_le_bytes());
    let ms = (u32::from(version.major) << 16) | u32::from(version.minor);
    let ls = (u32::from(version.build) << 16) | u32::from(version.revision);
    // File version, then product version
    for word in [ms, ls, ms, ls] {
        image.extend_from_slice(&word.to_le_bytes());
    }
    image.resize(image.len() + 64, 0);
    image
}

/// Create a media folder `root/name` carrying both marker files
///
/// # Panics
///
/// Panics if the files cannot be written.
pub fn create_media(root: &Path, name: &str, version: FileVersion) -> PathBuf {
    let media = root.join(name);
    fs::create_dir_all(media.join("Updates")).expect("Failed to create media folder");
    fs::write(media.join("setup.exe"), fake_installer_image(version)).expect("write setup.exe");
    fs::write(media.join("PrerequisiteInstaller.exe"), b"MZ").expect("write prerequisite installer");
    fs::write(media.join("Updates").join("readme.txt"), b"Place updates here").expect("write readme");
    media
}

/// Write `count` dummy patch files into `dir`
///
/// # Panics
///
/// Panics if the files cannot be written.
pub fn write_patch_files(dir: &Path, count: usize) {
    fs::create_dir_all(dir).expect("Failed to create updates folder");
    for index in 0..count {
        fs::write(dir.join(format!("patch-{index:03}-x-none.msp")), b"msp").expect("write patch");
    }
}

/// Write a zip archive holding the given entries
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    for (name, content) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .expect("start zip entry");
        zip.write_all(content).expect("write zip entry");
    }
    zip.finish().expect("finish zip");
}

/// Run context with a silent progress reporter
#[must_use]
pub fn test_context() -> RunContext {
    RunContext::new(
        BuildReport::new("SP2010", "2010", "14.0.4763.1000", "/srv/SP/2010"),
        false,
        Box::new(SilentProgressReporter),
    )
}

/// Run context whose report writes the manifest to `destination`
#[must_use]
pub fn context_for(destination: &Path) -> RunContext {
    RunContext::new(
        BuildReport::new("SP2010", "2010", "14.0.4763.1000", destination),
        false,
        Box::new(SilentProgressReporter),
    )
}

/// Fetcher that writes a placeholder file instead of downloading
#[derive(Default)]
pub struct FakeFetcher {
    failing: HashSet<String>,
    fetched: RefCell<Vec<String>>,
}

impl FakeFetcher {
    /// Fail every fetch of `url`
    #[must_use]
    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.fetched.borrow().len()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path, _progress: &mut dyn ProgressReporter) -> Result<u64> {
        if self.failing.contains(url) {
            return Err(error::transfer::fetch_failed(url, 4, "connection reset by peer"));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, b"payload")?;
        self.fetched.borrow_mut().push(url.to_string());
        Ok(7)
    }
}

/// Expander that creates configured files instead of running installers
#[derive(Default)]
pub struct FakeExpander {
    outputs: HashMap<String, Vec<String>>,
    failure_log: Option<(PathBuf, String)>,
    expanded: RefCell<Vec<String>>,
    unwraps: Cell<usize>,
}

impl FakeExpander {
    /// Expanding a payload called `payload` creates `files` in the target
    #[must_use]
    pub fn producing(mut self, payload: &str, files: &[&str]) -> Self {
        self.outputs.insert(
            payload.to_lowercase(),
            files.iter().map(|f| (*f).to_string()).collect(),
        );
        self
    }

    /// Every expansion also leaves `opatchinstall.log` with `contents` in `dir`
    #[must_use]
    pub fn logging(mut self, dir: &Path, contents: &str) -> Self {
        self.failure_log = Some((dir.to_path_buf(), contents.to_string()));
        self
    }

    pub fn expansions(&self) -> usize {
        self.expanded.borrow().len()
    }

    /// File names of every payload expanded so far
    pub fn expanded_payloads(&self) -> Vec<String> {
        self.expanded.borrow().clone()
    }

    pub fn unwraps(&self) -> usize {
        self.unwraps.get()
    }
}

impl Expand for FakeExpander {
    fn expand(&self, payload: &Path, target: &Path) -> Result<()> {
        let name = payload
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        fs::create_dir_all(target)?;
        for file in self.outputs.get(&name).into_iter().flatten() {
            fs::write(target.join(file), b"expanded")?;
        }
        if let Some((dir, contents)) = &self.failure_log {
            fs::write(dir.join("opatchinstall.log"), contents)?;
        }
        self.expanded.borrow_mut().push(name);
        Ok(())
    }

    fn unwrap_zip(&self, archive: &Path, work_dir: &Path) -> Result<PathBuf> {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        fs::create_dir_all(work_dir)?;
        let inner = work_dir.join(format!("{stem}.exe"));
        fs::write(&inner, b"MZ")?;
        self.unwraps.set(self.unwraps.get() + 1);
        Ok(inner)
    }
}

/// Expander knowing what every package of [`SAMPLE_CATALOG`] unpacks to
#[must_use]
pub fn sample_expander() -> FakeExpander {
    FakeExpander::default()
        .producing(
            "officeserver2010sp1-kb2460045-x64-fullfile-en-us.exe",
            &["oserversp1-x-none.msp", "wss-x-none.msp"],
        )
        .producing(
            "2760791_intl_x64_zip.exe",
            &["ubersrv-kb2760791.msp", "spsmui-fr-fr.msp", "spsmui-es-es.msp"],
        )
        .producing(
            "ubersrv2010-kb2817527-fullfile-x64-glb.exe",
            &["ubersrv-kb2817527.msp", "spsmui-fr-fr.msp"],
        )
        .producing("serverlanguagepack.exe", &["setup.exe", "osmui.xml"])
        .producing(
            "serverlanguagepack2010sp1-kb2460056-x64-fr-fr.exe",
            &["wssmui-fr-fr-sp1.msp"],
        )
        .producing(
            "ubersrvmui2010-kb2760791-x64-de-de.exe",
            &["spsmui-de-de-kb2760791.msp"],
        )
        .producing(
            "wacserver2010sp1-kb2460073-x64-fullfile-en-us.exe",
            &["wacserversp1-x-none.msp"],
        )
        .producing(
            "wacserver2010-kb2760794-fullfile-x64-glb.exe",
            &["wacserver-kb2760794.msp"],
        )
        .producing(
            "officeserversp2013-kb2880552-fullfile-x64-en-us.exe",
            &["oserversp1-x-none.msp"],
        )
        .producing("ubersrv2013-kb2817616-fullfile-x64-glb.exe", &["ubersrv-kb2817616.msp"])
}

/// Combine the fakes into a capability set, with a real mirror copy
#[must_use]
pub fn fake_capabilities<'a>(fetch: &'a FakeFetcher, expand: &'a FakeExpander) -> Capabilities<'a> {
    Capabilities {
        fetch,
        expand,
        copy: &MirrorCopy,
    }
}

/// Prompt that answers with a fixed name and remembers what it was offered
pub struct ScriptedPrompt {
    answer: Option<String>,
    offered: RefCell<Vec<String>>,
    calls: Cell<usize>,
}

impl ScriptedPrompt {
    /// Prompt that declines; tests assert it is never asked
    #[must_use]
    pub fn never() -> Self {
        Self {
            answer: None,
            offered: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    #[must_use]
    pub fn answering(name: &str) -> Self {
        Self {
            answer: Some(name.to_string()),
            ..Self::never()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn offered(&self) -> Vec<String> {
        self.offered.borrow().clone()
    }
}

impl CumulativeUpdatePrompt for ScriptedPrompt {
    fn choose(&self, _product: &Product, names: &[&str]) -> Result<Option<String>> {
        self.calls.set(self.calls.get() + 1);
        *self.offered.borrow_mut() = names.iter().map(|n| (*n).to_string()).collect();
        Ok(self.answer.clone())
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::version::parse_file_version;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_fake_installer_image_round_trips_version() {
        let version = FileVersion::new(14, 0, 7015, 1000);
        assert_eq!(parse_file_version(&fake_installer_image(version)).unwrap(), version);
    }

    #[test]
    fn test_create_media_has_markers() {
        let temp = create_temp_dir();
        let media = create_media(temp.path(), "cdrom", FileVersion::new(14, 0, 4763, 1000));
        assert!(crate::media::is_product_media(&media));
    }

    #[test]
    fn test_create_test_files() {
        let temp = create_temp_dir();
        create_test_files(temp.path(), &[("Updates/readme.txt", "x")]);
        assert!(temp.path().join("Updates/readme.txt").exists());
    }
}
