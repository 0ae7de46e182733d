//! File version of a Windows executable
//!
//! Reads the `VS_FIXEDFILEINFO` block from the version resource. Rather than
//! walking the PE resource directory, the image is scanned for the block's
//! signature followed by its fixed structure version, which is unambiguous in
//! practice and works on any host OS.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{self, Result};

/// `MZ`
const DOS_SIGNATURE: u16 = 0x5A4D;
/// `VS_FIXEDFILEINFO::dwSignature`
const FIXED_FILE_INFO_SIGNATURE: u32 = 0xFEEF_04BD;
/// `VS_FIXEDFILEINFO::dwStrucVersion` of every image produced since Win32
const FIXED_FILE_INFO_VERSION: u32 = 0x0001_0000;

/// Four-part file version, e.g. `14.0.4763.1000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl FileVersion {
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    fn from_ms_ls(ms: u32, ls: u32) -> Self {
        Self {
            major: high_word(ms),
            minor: low_word(ms),
            build: high_word(ls),
            revision: low_word(ls),
        }
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Read the file version embedded in the executable at `path`
pub fn read_file_version(path: &Path) -> Result<FileVersion> {
    let image = fs::read(path)
        .map_err(|e| error::source::version_unreadable(path.display().to_string(), e.to_string()))?;
    parse_file_version(&image)
        .map_err(|reason| error::source::version_unreadable(path.display().to_string(), reason))
}

/// Locate `VS_FIXEDFILEINFO` in a PE image
pub fn parse_file_version(image: &[u8]) -> std::result::Result<FileVersion, String> {
    if read_u16(image, 0) != Some(DOS_SIGNATURE) {
        return Err("not a Windows executable".to_string());
    }

    let signature = FIXED_FILE_INFO_SIGNATURE.to_le_bytes();
    let mut offset = 0;
    while let Some(found) = find(&image[offset..], &signature) {
        let start = offset + found;
        if read_u32(image, start + 4) == Some(FIXED_FILE_INFO_VERSION) {
            let ms = read_u32(image, start + 8);
            let ls = read_u32(image, start + 12);
            return match (ms, ls) {
                (Some(ms), Some(ls)) => Ok(FileVersion::from_ms_ls(ms, ls)),
                _ => Err("version resource is truncated".to_string()),
            };
        }
        offset = start + 1;
    }

    Err("no version resource found".to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[allow(clippy::cast_possible_truncation)]
fn high_word(value: u32) -> u16 {
    (value >> 16) as u16
}

#[allow(clippy::cast_possible_truncation)]
fn low_word(value: u32) -> u16 {
    (value & 0xFFFF) as u16
}
