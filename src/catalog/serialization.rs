//! On-disk catalog document (catalog.yaml)
//!
//! The document is deserialized into these loosely-validated records first and
//! then converted into the typed model in [`super`], where required fields and
//! cross-references are checked once at load time.

use serde::{Deserialize, Deserializer};

/// Root of catalog.yaml
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// One product (e.g. SharePoint Server 2010)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRecord {
    pub key: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version_prefix: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<PackageRecord>,
    #[serde(default)]
    pub service_packs: Vec<PackageRecord>,
    #[serde(default)]
    pub cumulative_updates: Vec<PackageRecord>,
    #[serde(default)]
    pub language_packs: Vec<LanguagePackRecord>,
    pub office_web_apps: Option<OfficeWebAppsRecord>,
}

/// A downloadable update, prerequisite or service pack
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageRecord {
    pub name: Option<String>,
    pub url: Option<String>,
    pub expanded_file: Option<String>,
    pub service_pack: Option<String>,
    pub min_patch_files: Option<usize>,
}

/// A language pack with its own nested updates
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguagePackRecord {
    pub culture: Option<String>,
    pub url: Option<String>,
    pub expanded_file: Option<String>,
    #[serde(default)]
    pub service_packs: Vec<PackageRecord>,
    #[serde(default)]
    pub cumulative_updates: Vec<PackageRecord>,
}

/// Office Web Apps companion catalog
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfficeWebAppsRecord {
    #[serde(default)]
    pub service_packs: Vec<PackageRecord>,
    #[serde(default)]
    pub cumulative_updates: Vec<PackageRecord>,
}

/// Accept `year: 2010` as well as `year: "2010"`
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
    }))
}
