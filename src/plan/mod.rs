//! Build plans
//!
//! A [`BuildPlan`] is the one immutable description of a run: which product,
//! where the media and destination are, and which packages go into which
//! folder. [`selection::SelectionResolver`] builds it; everything downstream
//! only reads it.

pub mod prompt;
pub mod selection;

use std::path::{Path, PathBuf};

use crate::catalog::{LanguagePack, Product, UpdatePackage};

pub const SHAREPOINT_DIR: &str = "SharePoint";
pub const OWA_DIR: &str = "OfficeWebApps";
pub const LANGUAGE_PACKS_DIR: &str = "LanguagePacks";
pub const UPDATES_DIR: &str = "Updates";
pub const PREREQUISITES_DIR: &str = "PrerequisiteInstallerFiles";

/// What the operator asked for
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub source: PathBuf,
    pub owa_source: Option<PathBuf>,
    pub destination: PathBuf,
    pub staging: PathBuf,
    pub prerequisites: bool,
    pub cumulative_update: Option<String>,
    pub languages: Vec<String>,
}

/// One selected language and its matching updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelection {
    pub pack: LanguagePack,
    pub service_pack: Option<UpdatePackage>,
    pub cumulative_update: Option<UpdatePackage>,
}

impl LanguageSelection {
    pub fn culture_id(&self) -> &str {
        &self.pack.culture_id
    }
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub product: Product,
    pub source: PathBuf,
    pub owa_source: Option<PathBuf>,
    pub destination: PathBuf,
    pub staging: PathBuf,
    pub prerequisites: Vec<UpdatePackage>,
    pub service_pack: Option<UpdatePackage>,
    pub cumulative_update: Option<UpdatePackage>,
    pub owa_service_pack: Option<UpdatePackage>,
    pub owa_cumulative_update: Option<UpdatePackage>,
    pub languages: Vec<LanguageSelection>,
}

impl BuildPlan {
    pub fn sharepoint_dir(&self) -> PathBuf {
        self.destination.join(SHAREPOINT_DIR)
    }

    pub fn updates_dir(&self) -> PathBuf {
        self.sharepoint_dir().join(UPDATES_DIR)
    }

    pub fn prerequisites_dir(&self) -> PathBuf {
        self.sharepoint_dir().join(PREREQUISITES_DIR)
    }

    pub fn owa_dir(&self) -> PathBuf {
        self.destination.join(OWA_DIR)
    }

    pub fn owa_updates_dir(&self) -> PathBuf {
        self.owa_dir().join(UPDATES_DIR)
    }

    /// Office Web Apps downloads stage apart from the SharePoint ones
    pub fn owa_staging_dir(&self) -> PathBuf {
        self.staging.join(OWA_DIR)
    }

    pub fn language_dir(&self, culture_id: &str) -> PathBuf {
        self.destination.join(LANGUAGE_PACKS_DIR).join(culture_id)
    }

    pub fn language_updates_dir(&self, culture_id: &str) -> PathBuf {
        self.language_dir(culture_id).join(UPDATES_DIR)
    }

    /// Language downloads often share a file name, so each culture stages separately
    pub fn language_staging_dir(&self, culture_id: &str) -> PathBuf {
        self.staging.join(LANGUAGE_PACKS_DIR).join(culture_id)
    }

    pub fn culture_ids(&self) -> Vec<&str> {
        self.languages.iter().map(LanguageSelection::culture_id).collect()
    }
}

/// Staging folder used when none is given
pub fn default_staging(destination: &Path) -> PathBuf {
    destination.join(UPDATES_DIR)
}
