//! Build report and the `_SLIPSTREAMED.txt` manifest
//!
//! The report only ever records what actually happened: stages that ran,
//! stages that were skipped on purpose, and every recoverable problem. The
//! manifest is rendered from it and written to the destination root at the end
//! of every run, complete or not.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{self, Result, SlipstreamError};

/// Summary file written to the destination root
pub const MANIFEST_FILE: &str = "_SLIPSTREAMED.txt";

/// Layering stages in the order the engine runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    BaseCopy,
    Prerequisite,
    ServicePack,
    CumulativeUpdate,
    OwaBaseCopy,
    OwaServicePack,
    OwaCumulativeUpdate,
    LanguagePack,
    LanguageServicePack,
    LanguageCumulativeUpdate,
    LanguagePatchCopy,
}

impl StageKind {
    pub fn label(self) -> &'static str {
        match self {
            StageKind::BaseCopy => "Base media",
            StageKind::Prerequisite => "Prerequisite",
            StageKind::ServicePack => "Service pack",
            StageKind::CumulativeUpdate => "Cumulative update",
            StageKind::OwaBaseCopy => "Office Web Apps media",
            StageKind::OwaServicePack => "Office Web Apps service pack",
            StageKind::OwaCumulativeUpdate => "Office Web Apps cumulative update",
            StageKind::LanguagePack => "Language pack",
            StageKind::LanguageServicePack => "Language service pack",
            StageKind::LanguageCumulativeUpdate => "Language cumulative update",
            StageKind::LanguagePatchCopy => "Language patches from cumulative update",
        }
    }
}

/// A stage that ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStage {
    pub kind: StageKind,
    /// Package or culture the stage worked on
    pub subject: String,
    pub detail: Option<String>,
}

/// A stage that was planned but deliberately not run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStage {
    pub kind: StageKind,
    pub subject: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    Selection,
    Fetch,
    Extraction,
    Filesystem,
}

impl WarningCategory {
    /// Category a recoverable error is filed under
    pub fn of(err: &SlipstreamError) -> Self {
        match err {
            SlipstreamError::InvalidCumulativeUpdate { .. }
            | SlipstreamError::InvalidLanguage { .. }
            | SlipstreamError::UnknownProduct { .. } => WarningCategory::Selection,
            SlipstreamError::FetchFailed { .. } => WarningCategory::Fetch,
            SlipstreamError::ExtractionFailed { .. } => WarningCategory::Extraction,
            _ => WarningCategory::Filesystem,
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningCategory::Selection => "selection",
            WarningCategory::Fetch => "download",
            WarningCategory::Extraction => "extraction",
            WarningCategory::Filesystem => "filesystem",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub category: WarningCategory,
    pub message: String,
    /// Diagnostic log the operator should look at
    pub log: Option<String>,
}

/// Everything one run did to the destination tree
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub product: String,
    pub year: String,
    pub version: String,
    pub destination: PathBuf,
    pub applied: Vec<AppliedStage>,
    pub skipped: Vec<SkippedStage>,
    pub notices: Vec<String>,
    pub warnings: Vec<Warning>,
    /// Packages fetched over the network in this run
    pub downloads: usize,
    /// Payloads expanded in this run
    pub expansions: usize,
    /// Files copied by base copies and language patch redistribution
    pub copied_files: usize,
}

impl BuildReport {
    pub fn new(
        product: impl Into<String>,
        year: impl Into<String>,
        version: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            product: product.into(),
            year: year.into(),
            version: version.into(),
            destination: destination.into(),
            applied: Vec::new(),
            skipped: Vec::new(),
            notices: Vec::new(),
            warnings: Vec::new(),
            downloads: 0,
            expansions: 0,
            copied_files: 0,
        }
    }

    pub fn record_applied(&mut self, kind: StageKind, subject: impl Into<String>, detail: Option<String>) {
        self.applied.push(AppliedStage {
            kind,
            subject: subject.into(),
            detail,
        });
    }

    pub fn record_skipped(&mut self, kind: StageKind, subject: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedStage {
            kind,
            subject: subject.into(),
            reason: reason.into(),
        });
    }

    pub fn add_warning(&mut self, err: &SlipstreamError) {
        self.warnings.push(Warning {
            category: WarningCategory::of(err),
            message: err.to_string(),
            log: err.log_path().map(str::to_string),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Index of the first applied stage of `kind`, used to check ordering
    pub fn position_of(&self, kind: StageKind) -> Option<usize> {
        self.applied.iter().position(|stage| stage.kind == kind)
    }

    pub fn was_applied(&self, kind: StageKind) -> bool {
        self.position_of(kind).is_some()
    }

    /// Cultures that received at least one applied language stage
    pub fn applied_cultures(&self) -> Vec<&str> {
        let mut cultures: Vec<&str> = Vec::new();
        for stage in &self.applied {
            let is_language = matches!(
                stage.kind,
                StageKind::LanguagePack
                    | StageKind::LanguageServicePack
                    | StageKind::LanguageCumulativeUpdate
                    | StageKind::LanguagePatchCopy
            );
            if is_language && !cultures.contains(&stage.subject.as_str()) {
                cultures.push(&stage.subject);
            }
        }
        cultures
    }

    /// Human-readable manifest text
    pub fn render_manifest(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "SharePoint Server {} ({}) slipstreamed installation source\n",
            self.year, self.product
        ));
        out.push_str(&format!("Base media version: {}\n", self.version));
        out.push_str(&format!("Destination: {}\n", self.destination.display()));

        out.push_str("\nApplied:\n");
        if self.applied.is_empty() {
            out.push_str("  (nothing)\n");
        }
        for stage in &self.applied {
            out.push_str(&format!("  - {}: {}", stage.kind.label(), stage.subject));
            if let Some(detail) = &stage.detail {
                out.push_str(&format!(" ({detail})"));
            }
            out.push('\n');
        }

        if !self.skipped.is_empty() {
            out.push_str("\nSkipped:\n");
            for stage in &self.skipped {
                out.push_str(&format!(
                    "  - {}: {} ({})\n",
                    stage.kind.label(),
                    stage.subject,
                    stage.reason
                ));
            }
        }

        if self.has_warnings() {
            out.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                out.push_str(&format!("  - [{}] {}\n", warning.category, warning.message));
                if let Some(log) = &warning.log {
                    out.push_str(&format!("    log: {log}\n"));
                }
            }
            out.push_str(
                "\nThis installation source may be incomplete. Re-run slipstream to finish it.\n",
            );
        }

        out
    }

    /// Write the manifest to the destination root, replacing an older one
    pub fn write_manifest(&self) -> Result<PathBuf> {
        write_manifest_to(&self.destination, &self.render_manifest())
    }
}

fn write_manifest_to(destination: &Path, text: &str) -> Result<PathBuf> {
    crate::common::fs::ensure_dir(destination)?;
    let path = destination.join(MANIFEST_FILE);
    if path.exists() {
        // A manifest copied from read-only media cannot be overwritten otherwise
        crate::common::fs::clear_readonly(&path)
            .map_err(|e| error::fs::attribute_clear_failed(&path, e.to_string()))?;
    }
    fs::write(&path, text).map_err(|e| error::fs::write_failed(&path, &e))?;
    Ok(path)
}
