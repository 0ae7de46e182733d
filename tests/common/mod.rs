//! Common test utilities for slipstream integration tests

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Catalog whose downloads all point at a closed local port
pub const OFFLINE_CATALOG: &str = r"
products:
  - key: SP2010
    year: 2010
    version_prefix: 14
    service_packs:
      - name: SP1
        url: http://127.0.0.1:9/officeserver2010sp1-kb2460045-x64-fullfile-en-us.exe
        expanded_file: oserversp1-x-none.msp
        min_patch_files: 46
    language_packs:
      - culture: fr-fr
        url: http://127.0.0.1:9/fr-fr/ServerLanguagePack.exe
        expanded_file: setup.exe
  - key: SP2013
    year: 2013
    version_prefix: 15
    service_packs:
      - name: SP1
        url: http://127.0.0.1:9/officeserversp2013-kb2880552-fullfile-x64-en-us.exe
        expanded_file: oserversp1-x-none.msp
        min_patch_files: 60
    cumulative_updates:
      - name: March 2013
        url: http://127.0.0.1:9/ubersrv2013-kb2767999-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2767999.msp
      - name: April 2013
        url: http://127.0.0.1:9/ubersrv2013-kb2760355-fullfile-x64-glb.exe
        expanded_file: ubersrv-kb2760355.msp
";

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn slipstream_cmd() -> Command {
    let mut cmd = Command::cargo_bin("slipstream").unwrap();
    // Never pick up a developer's catalog or destination
    cmd.env_remove("SLIPSTREAM_CATALOG");
    cmd.env_remove("SLIPSTREAM_DESTINATION");
    cmd.env_remove("SLIPSTREAM_FETCH_RETRIES");
    cmd.env_remove("SLIPSTREAM_FETCH_TIMEOUT");
    cmd
}

/// A scratch folder with a catalog, media folders and a destination
pub struct TestSite {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the site root
    pub path: PathBuf,
}

impl TestSite {
    /// Create a new test site
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the site
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from the site
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the site
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write `catalog.yaml` with the given content
    pub fn write_catalog(&self, content: &str) -> PathBuf {
        self.write_file("catalog.yaml", content)
    }

    /// Create media with both marker files whose setup.exe reports `major.0.build.revision`
    pub fn create_media(&self, name: &str, major: u16, build: u16, revision: u16) -> PathBuf {
        let media = self.path.join(name);
        fs::create_dir_all(&media).expect("Failed to create media folder");
        fs::write(media.join("setup.exe"), installer_image(major, 0, build, revision))
            .expect("Failed to write setup.exe");
        fs::write(media.join("PrerequisiteInstaller.exe"), b"MZ")
            .expect("Failed to write PrerequisiteInstaller.exe");
        media
    }
}

/// Minimal executable image carrying a `VS_FIXEDFILEINFO` block
pub fn installer_image(major: u16, minor: u16, build: u16, revision: u16) -> Vec<u8> {
    let mut image = vec![b'M', b'Z'];
    image.resize(0x80, 0);
    image.extend_from_slice(&0xFEEF_04BD_u32.to_le_bytes());
    image.extend_from_slice(&0x0001_0000_u32.to_le_bytes());
    let ms = (u32::from(major) << 16) | u32::from(minor);
    let ls = (u32::from(build) << 16) | u32::from(revision);
    for word in [ms, ls, ms, ls] {
        image.extend_from_slice(&word.to_le_bytes());
    }
    image.resize(image.len() + 32, 0);
    image
}
