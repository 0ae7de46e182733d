//! Run context threaded through every build stage
//!
//! Holds the build report, the output verbosity and the progress reporter so
//! no stage needs ambient state. Recoverable errors are funnelled through
//! [`RunContext::record`], which prints them straight away and files them in
//! the report.

use crate::error::{Result, SlipstreamError};
use crate::report::BuildReport;
use crate::ui::{ProgressReporter, status};

pub struct RunContext {
    pub report: BuildReport,
    verbose: bool,
    progress: Box<dyn ProgressReporter>,
}

impl RunContext {
    pub fn new(report: BuildReport, verbose: bool, progress: Box<dyn ProgressReporter>) -> Self {
        Self {
            report,
            verbose,
            progress,
        }
    }

    pub fn progress(&mut self) -> &mut dyn ProgressReporter {
        self.progress.as_mut()
    }

    pub fn step(&self, message: &str) {
        status::step(message);
    }

    pub fn info(&self, message: &str) {
        status::info(message);
    }

    /// Print and keep a notice about something skipped or adjusted on purpose
    pub fn notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        status::notice(&message);
        self.report.notices.push(message);
    }

    pub fn detail(&self, message: &str) {
        if self.verbose {
            status::detail(message);
        }
    }

    /// Record a recoverable error as a warning, or hand a fatal one back
    pub fn record(&mut self, err: SlipstreamError) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        status::warn(&err.to_string());
        if let Some(log) = err.log_path() {
            status::warn(&format!("See log: {log}"));
        }
        self.report.add_warning(&err);
        Ok(())
    }

    pub fn into_report(self) -> BuildReport {
        self.report
    }
}
