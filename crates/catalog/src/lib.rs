use std::collections::{BTreeMap, BTreeSet};

use foundation::EntityCode;
use serde::{Deserialize, Serialize};

/// Catalog shipped with the viewer.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
    /// Countries that belong to no region but still have geography.
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    EmptyRegionName,
    EmptySlug { region: String },
    EmptyCountryCode { region: Option<String> },
    DuplicateRegion(String),
    DuplicateSlug(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
            CatalogError::EmptyRegionName => write!(f, "region with empty name"),
            CatalogError::EmptySlug { region } => write!(f, "region {region} has an empty slug"),
            CatalogError::EmptyCountryCode { region: Some(r) } => {
                write!(f, "region {r} lists an empty country code")
            }
            CatalogError::EmptyCountryCode { region: None } => {
                write!(f, "catalog lists an empty country code")
            }
            CatalogError::DuplicateRegion(name) => write!(f, "duplicate region name: {name}"),
            CatalogError::DuplicateSlug(slug) => write!(f, "duplicate region slug: {slug}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: EntityCode,
    pub slug: EntityCode,
    pub countries: Vec<EntityCode>,
}

/// Static universe of recognized regions and countries.
///
/// Read-only once built. Regions keep file order; countries iterate in
/// ascending code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCatalog {
    regions: Vec<Region>,
    by_name: BTreeMap<EntityCode, usize>,
    countries: BTreeSet<EntityCode>,
}

impl ReferenceCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG_JSON)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(payload).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let mut regions = Vec::with_capacity(doc.regions.len());
        let mut by_name = BTreeMap::new();
        let mut slugs = BTreeSet::new();
        let mut countries = BTreeSet::new();

        for entry in doc.regions {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(CatalogError::EmptyRegionName);
            }
            let slug = entry.slug.trim();
            if slug.is_empty() {
                return Err(CatalogError::EmptySlug {
                    region: name.to_string(),
                });
            }
            if by_name.contains_key(name) {
                return Err(CatalogError::DuplicateRegion(name.to_string()));
            }
            if !slugs.insert(slug.to_string()) {
                return Err(CatalogError::DuplicateSlug(slug.to_string()));
            }

            let mut members = Vec::with_capacity(entry.countries.len());
            for code in entry.countries {
                let code = code.trim();
                if code.is_empty() {
                    return Err(CatalogError::EmptyCountryCode {
                        region: Some(name.to_string()),
                    });
                }
                let code = EntityCode::from(code);
                if !members.contains(&code) {
                    members.push(code.clone());
                }
                countries.insert(code);
            }

            by_name.insert(EntityCode::from(name), regions.len());
            regions.push(Region {
                name: EntityCode::from(name),
                slug: EntityCode::from(slug),
                countries: members,
            });
        }

        for code in doc.countries {
            let code = code.trim();
            if code.is_empty() {
                return Err(CatalogError::EmptyCountryCode { region: None });
            }
            countries.insert(EntityCode::from(code));
        }

        tracing::debug!(
            regions = regions.len(),
            countries = countries.len(),
            "reference catalog loaded"
        );

        Ok(Self {
            regions,
            by_name,
            countries,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|&idx| &self.regions[idx])
    }

    pub fn region_by_slug(&self, slug: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.slug.as_str() == slug)
    }

    pub fn region_names(&self) -> BTreeSet<EntityCode> {
        self.by_name.keys().cloned().collect()
    }

    pub fn countries(&self) -> &BTreeSet<EntityCode> {
        &self.countries
    }

    pub fn contains_region(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn contains_country(&self, code: &str) -> bool {
        self.countries.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, ReferenceCatalog};
    use foundation::EntityCode;
    use pretty_assertions::assert_eq;

    const SMALL: &str = r#"{
        "regions": [
            { "name": "Europe", "slug": "europe", "countries": ["FRA", "DEU"] },
            { "name": "North America", "slug": "north-america", "countries": ["USA", "CAN"] }
        ],
        "countries": ["ATA"]
    }"#;

    #[test]
    fn loads_regions_and_country_universe() {
        let catalog = ReferenceCatalog::from_json_str(SMALL).expect("catalog");
        assert_eq!(catalog.regions().len(), 2);

        let europe = catalog.region("Europe").expect("europe");
        assert_eq!(europe.slug, EntityCode::from("europe"));
        assert_eq!(
            europe.countries,
            vec![EntityCode::from("FRA"), EntityCode::from("DEU")]
        );

        let countries: Vec<&str> = catalog.countries().iter().map(|c| c.as_str()).collect();
        assert_eq!(countries, vec!["ATA", "CAN", "DEU", "FRA", "USA"]);
        assert!(catalog.contains_region("North America"));
        assert!(!catalog.contains_region("north-america"));
        assert_eq!(
            catalog.region_by_slug("north-america").map(|r| r.name.as_str()),
            Some("North America")
        );
    }

    #[test]
    fn rejects_duplicate_names_and_slugs() {
        let dup_name = r#"{"regions": [
            {"name": "A", "slug": "a", "countries": []},
            {"name": "A", "slug": "b", "countries": []}
        ]}"#;
        assert_eq!(
            ReferenceCatalog::from_json_str(dup_name),
            Err(CatalogError::DuplicateRegion("A".to_string()))
        );

        let dup_slug = r#"{"regions": [
            {"name": "A", "slug": "a", "countries": []},
            {"name": "B", "slug": "a", "countries": []}
        ]}"#;
        assert_eq!(
            ReferenceCatalog::from_json_str(dup_slug),
            Err(CatalogError::DuplicateSlug("a".to_string()))
        );
    }

    #[test]
    fn rejects_blank_fields() {
        let blank = r#"{"regions": [{"name": " ", "slug": "x"}]}"#;
        assert_eq!(
            ReferenceCatalog::from_json_str(blank),
            Err(CatalogError::EmptyRegionName)
        );
        let blank_country = r#"{"countries": [""]}"#;
        assert_eq!(
            ReferenceCatalog::from_json_str(blank_country),
            Err(CatalogError::EmptyCountryCode { region: None })
        );
        assert!(matches!(
            ReferenceCatalog::from_json_str("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
        assert!(!catalog.regions().is_empty());
        for region in catalog.regions() {
            for code in &region.countries {
                assert!(catalog.contains_country(code.as_str()));
            }
        }
        assert!(catalog.contains_country("USA"));
        assert_eq!(catalog.region_names().len(), catalog.regions().len());
    }
}
