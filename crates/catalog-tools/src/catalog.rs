//! Endpoint catalog data model and loading.
//!
//! The catalog is an exported collection of remote API operations grouped by feature. It is read
//! once at startup and never mutated afterwards; everything downstream borrows from it.
//!
//! Optional keys of the OpenAPI-like operation spec are resolved into defaulted fields here, so
//! the compiler and the router never have to poke at raw JSON.

use crate::error::{CatalogToolsError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Top-level exported catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EndpointCatalog {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub exported_at: Option<String>,
    /// Declared endpoint count. Not guaranteed to match the actual lists.
    #[serde(default)]
    pub total_endpoints: Option<usize>,
    pub endpoints: FeatureMap,
}

/// Features in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap(Vec<Feature>);

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub endpoints: Vec<EndpointDefinition>,
    /// The endpoint list exactly as it appeared in the catalog file.
    pub raw: Value,
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EndpointDefinition {
    pub title: String,
    pub method: String,
    /// URL template with `{param}` placeholders.
    pub path: String,
    #[serde(default)]
    pub spec: EndpointSpec,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EndpointSpec {
    #[serde(default)]
    pub spec: OperationSpec,
    #[serde(default)]
    pub meta: EndpointMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OperationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(
        default,
        rename = "requestBody",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBodySpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PropertySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RequestBodySpec {
    #[serde(default)]
    pub content: BTreeMap<String, MediaTypeSpec>,
}

impl RequestBodySpec {
    /// Object schema of the `application/json` content, if any.
    #[must_use]
    pub fn json_schema(&self) -> Option<&ObjectSchema> {
        self.content.get("application/json").map(|m| &m.schema)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MediaTypeSpec {
    #[serde(default)]
    pub schema: ObjectSchema,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ObjectSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(default)]
    pub required: Vec<String>,
}

/// The subset of a JSON schema that survives projection: type name and description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PropertySpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `type` is a single name in OpenAPI 3.0 and may be a list in 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    Name(String),
    Names(Vec<String>),
}

impl Default for SchemaType {
    fn default() -> Self {
        Self::Name("string".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EndpointMeta {
    #[serde(default)]
    pub servers: Vec<ServerSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EndpointDefinition {
    #[must_use]
    pub fn operation(&self) -> &OperationSpec {
        &self.spec.spec
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.spec.spec.summary.as_deref()
    }

    /// Base URL of the first declared server.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.spec.meta.servers.first().map(|s| s.url.as_str())
    }

    /// Whether the literal token `{name}` occurs in the path template.
    #[must_use]
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.path.contains(&format!("{{{name}}}"))
    }

}

impl EndpointCatalog {
    /// Load a catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't a valid catalog document.
    pub fn load(path: &Path) -> Result<Self> {
        let location = path.display().to_string();
        tracing::info!("Loading API collection from: {location}");
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogToolsError::CatalogReadFile {
            path: location.clone(),
            source: e,
        })?;
        Self::parse(&location, &raw)
    }

    /// Parse a catalog document. `location` is only used for error context.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` isn't a valid catalog document.
    pub fn parse(location: &str, raw: &str) -> Result<Self> {
        let catalog: Self =
            serde_json::from_str(raw).map_err(|e| CatalogToolsError::CatalogParse {
                path: location.to_string(),
                source: e,
            })?;

        let actual = catalog.endpoint_count();
        if let Some(declared) = catalog.total_endpoints
            && declared != actual
        {
            tracing::warn!(
                "Catalog '{location}' declares {declared} endpoints but contains {actual}"
            );
        }
        tracing::info!(
            "Loaded {actual} API endpoints across {} features",
            catalog.endpoints.len()
        );
        Ok(catalog)
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.endpoints.iter()
    }

    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.endpoints.get(name)
    }

    /// First endpoint of `feature` whose title equals `title` exactly, with its owning feature.
    #[must_use]
    pub fn find_endpoint(&self, feature: &str, title: &str) -> Option<(&Feature, &EndpointDefinition)> {
        let feature = self.feature(feature)?;
        let endpoint = feature.endpoints.iter().find(|ep| ep.title == title)?;
        Some((feature, endpoint))
    }

    /// Actual number of endpoints across all features.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.iter().map(|f| f.endpoints.len()).sum()
    }
}

impl FeatureMap {
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.0.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, feature: Feature) {
        // A repeated key replaces the earlier list but keeps its position.
        if let Some(existing) = self.0.iter_mut().find(|f| f.name == feature.name) {
            *existing = feature;
        } else {
            self.0.push(feature);
        }
    }
}

impl<'a> IntoIterator for &'a FeatureMap {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de> Deserialize<'de> for FeatureMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FeatureMapVisitor;

        impl<'de> Visitor<'de> for FeatureMapVisitor {
            type Value = FeatureMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature name to endpoint list")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<FeatureMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = FeatureMap::default();
                while let Some((name, raw)) = access.next_entry::<String, Value>()? {
                    let endpoints = Vec::<EndpointDefinition>::deserialize(&raw).map_err(|e| {
                        <A::Error as serde::de::Error>::custom(format!("feature '{name}': {e}"))
                    })?;
                    map.insert(Feature {
                        name,
                        endpoints,
                        raw,
                    });
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FeatureMapVisitor)
    }
}

impl Serialize for FeatureMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for feature in &self.0 {
            map.serialize_entry(&feature.name, &feature.raw)?;
        }
        map.end()
    }
}
