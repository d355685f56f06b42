//! Feature enablement: which catalog features are advertised as tools.
//!
//! The map is permissive when empty (every feature enabled) and an allowlist otherwise: a feature
//! missing from a non-empty map counts as disabled.

use crate::catalog::EndpointCatalog;
use crate::error::{CatalogToolsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeatureEnablement(BTreeMap<String, bool>);

impl FeatureEnablement {
    /// Empty map: every feature enabled.
    #[must_use]
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Load the enablement file. A missing file is the permissive map.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or isn't a JSON object of booleans.
    pub fn load(path: &Path) -> Result<Self> {
        let location = path.display().to_string();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::permissive()),
            Err(e) => {
                return Err(CatalogToolsError::EnablementReadFile {
                    path: location,
                    source: e,
                });
            }
        };
        let map: Self =
            serde_json::from_str(&raw).map_err(|e| CatalogToolsError::EnablementParse {
                path: location,
                source: e,
            })?;
        tracing::info!(
            "Loaded feature filter: {} features enabled",
            map.enabled_feature_count()
        );
        Ok(map)
    }

    /// Replace the enablement file with this map (pretty JSON).
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let location = path.display().to_string();
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes).map_err(|e| CatalogToolsError::EnablementWriteFile {
            path: location,
            source: e,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.is_empty() || self.0.get(feature).copied().unwrap_or(false)
    }

    /// Number of entries explicitly set to `true`.
    #[must_use]
    pub fn enabled_feature_count(&self) -> usize {
        self.0.values().filter(|v| **v).count()
    }
}

impl FromIterator<(String, bool)> for FeatureEnablement {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Endpoint identity shown in feature listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    pub title: String,
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub count: usize,
    pub enabled: bool,
    pub endpoints: Vec<EndpointSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnablementStats {
    pub total: usize,
    pub enabled: usize,
    pub features_total: usize,
    pub features_enabled: usize,
}

/// Per-feature listing in catalog order, with the effective enabled flag.
#[must_use]
pub fn feature_summaries(
    catalog: &EndpointCatalog,
    enablement: &FeatureEnablement,
) -> Vec<FeatureSummary> {
    catalog
        .features()
        .map(|feature| FeatureSummary {
            name: feature.name.clone(),
            count: feature.endpoints.len(),
            enabled: enablement.is_enabled(&feature.name),
            endpoints: feature
                .endpoints
                .iter()
                .map(|ep| EndpointSummary {
                    title: ep.title.clone(),
                    method: ep.method.clone(),
                    path: ep.path.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Aggregate counts. Entries naming features the catalog doesn't have are ignored.
#[must_use]
pub fn enablement_stats(catalog: &EndpointCatalog, enablement: &FeatureEnablement) -> EnablementStats {
    let mut stats = EnablementStats {
        total: 0,
        enabled: 0,
        features_total: catalog.endpoints.len(),
        features_enabled: 0,
    };
    for feature in catalog.features() {
        stats.total += feature.endpoints.len();
        if enablement.is_enabled(&feature.name) {
            stats.enabled += feature.endpoints.len();
            stats.features_enabled += 1;
        }
    }
    stats
}
