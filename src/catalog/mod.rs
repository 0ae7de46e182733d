//! Update catalog
//!
//! The catalog describes, per product, every artifact slipstream knows how to
//! fetch: prerequisites, service packs, cumulative updates, language packs and
//! the Office Web Apps companion updates.
//!
//! ## Structure
//!
//! ```text
//! catalog.yaml
//! └── products[]
//!     ├── key / year / version_prefix
//!     ├── prerequisites[]
//!     ├── service_packs[]         (each declares min_patch_files)
//!     ├── cumulative_updates[]    (catalog order is display order)
//!     ├── language_packs[]
//!     │   ├── service_packs[]
//!     │   └── cumulative_updates[]
//!     └── office_web_apps
//!         ├── service_packs[]
//!         └── cumulative_updates[]
//! ```
//!
//! The document is parsed and validated once; after that the catalog is
//! read-only.

pub mod serialization;


use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{self, Result};
use serialization::{
    CatalogDocument, LanguagePackRecord, OfficeWebAppsRecord, PackageRecord, ProductRecord,
};

/// File name of the catalog shipped next to the executable
pub const CATALOG_FILE: &str = "catalog.yaml";

/// Suffix Microsoft uses for hotfix downloads that are zip archives wrapped in an executable
const ZIP_WRAPPED_SUFFIX: &str = "_zip.exe";

/// What role a package plays in the destination tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    Prerequisite,
    ServicePack,
    CumulativeUpdate,
    LanguagePack,
    LanguageServicePack,
    LanguageCumulativeUpdate,
    OwaServicePack,
    OwaCumulativeUpdate,
}

/// One downloadable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePackage {
    pub kind: PackageKind,
    pub name: String,
    pub url: String,
    /// File expected in the destination folder once the package is expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_file: Option<String>,
    pub applies_to_product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to_service_pack: Option<String>,
    /// Minimum patch file count that marks an `Updates` folder as already slipstreamed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_patch_files: Option<usize>,
}

impl UpdatePackage {
    /// File name of the download, taken from the last URL path segment
    pub fn file_name(&self) -> String {
        file_name_from_url(&self.url)
    }

    /// Whether the download is a zip archive disguised as an executable
    pub fn is_zip_wrapped(&self) -> bool {
        self.file_name()
            .to_ascii_lowercase()
            .ends_with(ZIP_WRAPPED_SUFFIX)
    }

    /// Whether the download is an archive, plain or wrapped
    pub fn is_archive(&self) -> bool {
        self.is_zip_wrapped() || self.file_name().to_ascii_lowercase().ends_with(".zip")
    }

    /// File name the download carries once normalized to a recognizable archive suffix
    pub fn archive_file_name(&self) -> String {
        let file_name = self.file_name();
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            file_name
        } else if let Some(stem) = lower.strip_suffix(".exe").and_then(|s| file_name.get(..s.len())) {
            format!("{stem}.zip")
        } else {
            format!("{file_name}.zip")
        }
    }

    /// Prerequisites that are not archives are used exactly as downloaded
    pub fn is_plain_download(&self) -> bool {
        self.kind == PackageKind::Prerequisite && !self.is_archive()
    }

    /// File whose presence in the destination folder proves the package is in place
    pub fn expected_file(&self) -> Option<String> {
        match &self.expanded_file {
            Some(file) => Some(file.clone()),
            None if self.is_plain_download() => Some(self.file_name()),
            None => None,
        }
    }
}

/// Localized add-on for one culture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePack {
    pub culture_id: String,
    pub package: UpdatePackage,
    pub service_packs: Vec<UpdatePackage>,
    pub cumulative_updates: Vec<UpdatePackage>,
}

impl LanguagePack {
    /// Language service pack carrying the given name
    pub fn find_service_pack(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.service_packs, name)
    }

    /// Language cumulative update carrying the given name
    pub fn find_cumulative_update(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.cumulative_updates, name)
    }
}

/// Office Web Apps updates belonging to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficeWebApps {
    pub service_packs: Vec<UpdatePackage>,
    pub cumulative_updates: Vec<UpdatePackage>,
}

impl OfficeWebApps {
    pub fn find_service_pack(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.service_packs, name)
    }

    pub fn find_cumulative_update(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.cumulative_updates, name)
    }
}

/// A product the catalog knows how to slipstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Catalog key, e.g. `SP2010`
    pub key: String,
    /// Year label, e.g. `2010`
    pub year: String,
    /// Major file version of setup.exe, e.g. `14`
    pub version_prefix: String,
    pub prerequisites: Vec<UpdatePackage>,
    pub service_packs: Vec<UpdatePackage>,
    pub cumulative_updates: Vec<UpdatePackage>,
    pub language_packs: Vec<LanguagePack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_web_apps: Option<OfficeWebApps>,
}

impl Product {
    /// Names of the cumulative updates in catalog order
    pub fn list_cumulative_updates(&self) -> Vec<&str> {
        self.cumulative_updates
            .iter()
            .map(|cu| cu.name.as_str())
            .collect()
    }

    pub fn find_service_pack(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.service_packs, name)
    }

    pub fn find_cumulative_update(&self, name: &str) -> Option<&UpdatePackage> {
        find_named(&self.cumulative_updates, name)
    }

    /// Language pack for a culture id (`fr-fr`, `FR-fr`, ...)
    pub fn find_language_pack(&self, culture_id: &str) -> Option<&LanguagePack> {
        self.language_packs
            .iter()
            .find(|lp| lp.culture_id.eq_ignore_ascii_case(culture_id.trim()))
    }

    /// Whether a version string (`14`, `14.0`, `14.0.4763.1000`) belongs to this product
    pub fn matches_version(&self, version: &str) -> bool {
        let version = version.trim();
        version == self.version_prefix
            || version
                .strip_prefix(self.version_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// The loaded, validated catalog
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load and validate the catalog at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(error::catalog::not_found(path.display().to_string()));
        }

        let yaml = fs::read_to_string(path).map_err(|e| {
            error::catalog::parse_failed(path.display().to_string(), e.to_string())
        })?;

        Self::parse(&yaml, &path.display().to_string())
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<inline>")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(yaml)
            .map_err(|e| error::catalog::parse_failed(origin, e.to_string()))?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self> {
        if document.products.is_empty() {
            return Err(error::catalog::invalid("catalog declares no products"));
        }

        let mut keys = HashSet::new();
        let mut prefixes = HashSet::new();
        let mut products = Vec::with_capacity(document.products.len());

        for (index, record) in document.products.into_iter().enumerate() {
            let product = convert_product(record, index)?;
            if !keys.insert(product.key.to_lowercase()) {
                return Err(error::catalog::invalid(format!(
                    "duplicate product key '{}'",
                    product.key
                )));
            }
            if !prefixes.insert(product.version_prefix.clone()) {
                return Err(error::catalog::invalid(format!(
                    "version prefix '{}' is declared by more than one product",
                    product.version_prefix
                )));
            }
            products.push(product);
        }

        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product whose version prefix matches a detected installer version
    pub fn lookup_product(&self, version: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.matches_version(version))
    }

    /// Product by catalog key (case-insensitive)
    pub fn find_product(&self, key: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key.trim()))
    }

    /// Year labels of every product, used to recognize defaulted destinations
    pub fn year_labels(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.year.as_str()).collect()
    }
}

/// Catalog path: the explicit one, else `catalog.yaml` beside the executable
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let exe = std::env::current_exe().map_err(|e| {
        error::fs::io_error(format!("Failed to locate the running executable: {e}"))
    })?;
    let dir = exe
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(dir.join(CATALOG_FILE))
}

fn find_named<'a>(packages: &'a [UpdatePackage], name: &str) -> Option<&'a UpdatePackage> {
    let name = name.trim();
    packages.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn required(value: Option<String>, field: &str, context: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(error::catalog::invalid(format!(
            "{context}: missing required field '{field}'"
        ))),
    }
}

fn required_url(value: Option<String>, context: &str) -> Result<String> {
    let url = required(value, "url", context)?;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(error::catalog::invalid(format!(
            "{context}: url '{url}' must be an http(s) URL"
        )));
    }
    if file_name_from_url(&url).is_empty() {
        return Err(error::catalog::invalid(format!(
            "{context}: url '{url}' does not name a file"
        )));
    }
    Ok(url)
}

fn convert_product(record: ProductRecord, index: usize) -> Result<Product> {
    let key = required(record.key, "key", &format!("product #{}", index + 1))?;
    let context = format!("product '{key}'");
    let year = required(record.year, "year", &context)?;
    let version_prefix = required(record.version_prefix, "version_prefix", &context)?;

    let prerequisites = convert_packages(
        record.prerequisites,
        PackageKind::Prerequisite,
        &key,
        &format!("{context} prerequisites"),
    )?;
    let service_packs = convert_service_packs(
        record.service_packs,
        PackageKind::ServicePack,
        &key,
        &format!("{context} service_packs"),
    )?;
    if service_packs.is_empty() {
        return Err(error::catalog::invalid(format!(
            "{context}: at least one service pack is required"
        )));
    }
    let cumulative_updates = convert_packages(
        record.cumulative_updates,
        PackageKind::CumulativeUpdate,
        &key,
        &format!("{context} cumulative_updates"),
    )?;

    let mut cultures = HashSet::new();
    let mut language_packs = Vec::with_capacity(record.language_packs.len());
    for lp in record.language_packs {
        let pack = convert_language_pack(lp, &key, &context)?;
        if !cultures.insert(pack.culture_id.clone()) {
            return Err(error::catalog::invalid(format!(
                "{context}: language '{}' is declared twice",
                pack.culture_id
            )));
        }
        language_packs.push(pack);
    }

    let office_web_apps = record
        .office_web_apps
        .map(|owa| convert_office_web_apps(owa, &key, &context))
        .transpose()?;

    Ok(Product {
        key,
        year,
        version_prefix,
        prerequisites,
        service_packs,
        cumulative_updates,
        language_packs,
        office_web_apps,
    })
}

fn convert_package(
    record: PackageRecord,
    kind: PackageKind,
    product: &str,
    context: &str,
) -> Result<UpdatePackage> {
    let name = required(record.name, "name", context)?;
    let context = format!("{context} '{name}'");
    let url = required_url(record.url, &context)?;

    let package = UpdatePackage {
        kind,
        name,
        url,
        expanded_file: record.expanded_file.filter(|f| !f.trim().is_empty()),
        applies_to_product: product.to_string(),
        applies_to_service_pack: record.service_pack,
        min_patch_files: record.min_patch_files,
    };
    require_expanded_file(&package, &context)?;
    Ok(package)
}

/// Packages that get expanded must name the file proving they are in place
fn require_expanded_file(package: &UpdatePackage, context: &str) -> Result<()> {
    if package.expected_file().is_none() {
        return Err(error::catalog::invalid(format!(
            "{context}: missing required field 'expanded_file'"
        )));
    }
    Ok(())
}

fn convert_packages(
    records: Vec<PackageRecord>,
    kind: PackageKind,
    product: &str,
    context: &str,
) -> Result<Vec<UpdatePackage>> {
    let mut names = HashSet::new();
    let mut packages = Vec::with_capacity(records.len());
    for record in records {
        let package = convert_package(record, kind, product, context)?;
        if !names.insert(package.name.to_lowercase()) {
            return Err(error::catalog::invalid(format!(
                "{context}: '{}' is declared twice",
                package.name
            )));
        }
        packages.push(package);
    }
    Ok(packages)
}

fn convert_service_packs(
    records: Vec<PackageRecord>,
    kind: PackageKind,
    product: &str,
    context: &str,
) -> Result<Vec<UpdatePackage>> {
    let packages = convert_packages(records, kind, product, context)?;
    if let Some(missing) = packages.iter().find(|p| p.min_patch_files.is_none()) {
        return Err(error::catalog::invalid(format!(
            "{context} '{}': missing required field 'min_patch_files'",
            missing.name
        )));
    }
    Ok(packages)
}

fn convert_language_pack(
    record: LanguagePackRecord,
    product: &str,
    context: &str,
) -> Result<LanguagePack> {
    let culture_id = required(record.culture, "culture", &format!("{context} language_packs"))?
        .to_lowercase();
    let context = format!("{context} language pack '{culture_id}'");
    let url = required_url(record.url, &context)?;

    let package = UpdatePackage {
        kind: PackageKind::LanguagePack,
        name: format!("Language Pack {culture_id}"),
        url,
        expanded_file: record.expanded_file.filter(|f| !f.trim().is_empty()),
        applies_to_product: product.to_string(),
        applies_to_service_pack: None,
        min_patch_files: None,
    };
    require_expanded_file(&package, &context)?;

    Ok(LanguagePack {
        package,
        service_packs: convert_packages(
            record.service_packs,
            PackageKind::LanguageServicePack,
            product,
            &format!("{context} service_packs"),
        )?,
        cumulative_updates: convert_packages(
            record.cumulative_updates,
            PackageKind::LanguageCumulativeUpdate,
            product,
            &format!("{context} cumulative_updates"),
        )?,
        culture_id,
    })
}

fn convert_office_web_apps(
    record: OfficeWebAppsRecord,
    product: &str,
    context: &str,
) -> Result<OfficeWebApps> {
    Ok(OfficeWebApps {
        service_packs: convert_service_packs(
            record.service_packs,
            PackageKind::OwaServicePack,
            product,
            &format!("{context} office_web_apps service_packs"),
        )?,
        cumulative_updates: convert_packages(
            record.cumulative_updates,
            PackageKind::OwaCumulativeUpdate,
            product,
            &format!("{context} office_web_apps cumulative_updates"),
        )?,
    })
}
