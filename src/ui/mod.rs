//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for downloads using indicatif
//! - Silent progress for unattended runs and tests
//! - Styled status lines (see [`status`]) and catalog/summary display (see [`display`])
//!
//! All transfer progress goes through the ProgressReporter trait, so the fetch
//! capability never talks to the terminal directly.

pub mod display;
pub mod status;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter trait for long-running transfers
pub trait ProgressReporter: Send + Sync {
    /// Start reporting a transfer; `total_bytes` is unknown for some servers
    fn start_transfer(&mut self, label: &str, total_bytes: Option<u64>);

    /// Set the number of bytes transferred so far
    fn set_position(&mut self, bytes: u64);

    /// Finish the current transfer
    fn finish_transfer(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with visual progress bars
pub struct InteractiveProgressReporter {
    transfer_pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self { transfer_pb: None }
    }

    fn style(known_length: bool) -> ProgressStyle {
        let template = if known_length {
            "  [{bar:40.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} eta {eta} {msg}"
        } else {
            "  {spinner:.cyan} {bytes} {bytes_per_sec} {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_transfer(&mut self, label: &str, total_bytes: Option<u64>) {
        let pb = match total_bytes {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(Self::style(total_bytes.is_some()));
        // Truncate long file names for display
        let display = if label.len() > 50 {
            let cut = label
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| i >= label.len() - 47)
                .unwrap_or(0);
            format!("...{}", &label[cut..])
        } else {
            label.to_string()
        };
        pb.set_message(display);
        self.transfer_pb = Some(pb);
    }

    fn set_position(&mut self, bytes: u64) {
        if let Some(ref pb) = self.transfer_pb {
            pb.set_position(bytes);
        }
    }

    fn finish_transfer(&mut self) {
        if let Some(pb) = self.transfer_pb.take() {
            pb.finish_and_clear();
        }
    }

    fn abandon(&mut self) {
        if let Some(pb) = self.transfer_pb.take() {
            pb.abandon();
        }
    }
}

/// Silent progress reporter
///
/// No-op implementation used with --no-prompt runs that are not attached to
/// a terminal, and in tests.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_transfer(&mut self, _label: &str, _total_bytes: Option<u64>) {}

    fn set_position(&mut self, _bytes: u64) {}

    fn finish_transfer(&mut self) {}

    fn abandon(&mut self) {}
}
