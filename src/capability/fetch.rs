//! Resumable HTTP downloads
//!
//! Bytes land in `<dest>.partial` first and the file is renamed once the body
//! has been read completely. A later attempt (or a later run) continues the
//! partial file with a `Range` request; servers that ignore the range get the
//! file restarted from zero.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::RANGE;

use super::Fetch;
use crate::common::fs::ensure_dir;
use crate::error::{self, Result};
use crate::ui::ProgressReporter;

/// Default number of retries after the first attempt
pub const DEFAULT_RETRIES: u32 = 3;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

const USER_AGENT: &str = concat!("slipstream/", env!("CARGO_PKG_VERSION"));
const CHUNK_SIZE: usize = 64 * 1024;

/// Retry and timeout settings for [`HttpFetcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Retries after the first attempt
    pub retries: u32,
    /// Per-request timeout, body included
    pub timeout: Duration,
    /// Base delay; attempt `n` waits `n * retry_delay`
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Blocking reqwest client with resume and bounded retry
pub struct HttpFetcher {
    client: Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| error::fs::io_error(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    /// Download once, continuing `partial` if it already holds bytes
    fn attempt(
        &self,
        url: &str,
        partial: &Path,
        label: &str,
        progress: &mut dyn ProgressReporter,
    ) -> std::result::Result<u64, String> {
        let existing = fs::metadata(partial).map(|m| m.len()).unwrap_or(0);

        let mut request = self.client.get(url);
        if existing > 0 {
            request = request.header(RANGE, format!("bytes={existing}-"));
        }
        let mut response = request
            .send()
            .map_err(|e| format!("Failed to connect: {e}"))?;

        let status = response.status();
        if status == StatusCode::RANGE_NOT_SATISFIABLE && existing > 0 {
            // The partial file already holds the whole body
            return Ok(existing);
        }
        if !status.is_success() {
            return Err(format!("HTTP error: {status}"));
        }

        let resumed = status == StatusCode::PARTIAL_CONTENT && existing > 0;
        let mut file = if resumed {
            OpenOptions::new().append(true).open(partial)
        } else {
            File::create(partial)
        }
        .map_err(|e| format!("Failed to open {}: {e}", partial.display()))?;

        let mut downloaded = if resumed { existing } else { 0 };
        let total = response.content_length().map(|len| len + downloaded);
        progress.start_transfer(label, total);
        progress.set_position(downloaded);

        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    progress.abandon();
                    return Err(format!("Read error: {e}"));
                }
            };
            if let Err(e) = file.write_all(&buffer[..read]) {
                progress.abandon();
                return Err(format!("Write error: {e}"));
            }
            downloaded += read as u64;
            progress.set_position(downloaded);
        }

        file.flush().map_err(|e| format!("Flush error: {e}"))?;
        progress.finish_transfer();

        if let Some(total) = total {
            if downloaded < total {
                return Err(format!(
                    "Connection closed after {downloaded} of {total} bytes"
                ));
            }
        }
        Ok(downloaded)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path, progress: &mut dyn ProgressReporter) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }

        let partial = partial_path(dest);
        let label = dest
            .file_name()
            .map_or_else(|| url.to_string(), |n| n.to_string_lossy().to_string());
        let attempts = self.settings.retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(url, &partial, &label, progress) {
                Ok(size) => {
                    fs::rename(&partial, dest)
                        .map_err(|e| error::fs::copy_failed(&partial, dest, e.to_string()))?;
                    return Ok(size);
                }
                Err(reason) => {
                    last_error = reason;
                    if attempt < attempts {
                        thread::sleep(self.settings.retry_delay * attempt);
                    }
                }
            }
        }

        Err(error::transfer::fetch_failed(url, attempts, last_error))
    }
}

/// Where an in-flight download is buffered
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    dest.with_file_name(name)
}
