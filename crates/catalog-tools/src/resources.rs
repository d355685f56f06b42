//! Read-only catalog resources: the whole catalog overview and one raw listing per feature.

use crate::catalog::{EndpointCatalog, Feature};
use rmcp::model::{Annotated, RawResource, Resource};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::json;

pub const CATALOG_URI: &str = "webex://api/catalog";
pub const FEATURE_URI_PREFIX: &str = "webex://api/feature/";
const JSON_MIME: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResource {
    pub uri: String,
    pub name: String,
    pub description: String,
}

impl CatalogResource {
    #[must_use]
    pub fn to_resource(&self) -> Resource {
        let mut raw = RawResource::new(self.uri.clone(), self.name.clone());
        raw.description = Some(self.description.clone());
        raw.mime_type = Some(JSON_MIME.to_string());
        Annotated::new(raw, None)
    }
}

#[must_use]
pub fn feature_uri(feature: &str) -> String {
    format!("{FEATURE_URI_PREFIX}{feature}")
}

/// The catalog overview followed by one resource per feature, in catalog order.
#[must_use]
pub fn list_resources(catalog: &EndpointCatalog) -> Vec<CatalogResource> {
    let mut out = vec![CatalogResource {
        uri: CATALOG_URI.to_string(),
        name: "Webex API Catalog".to_string(),
        description: "Catalog of all Webex APIs organized by feature".to_string(),
    }];
    out.extend(catalog.features().map(|f| CatalogResource {
        uri: feature_uri(&f.name),
        name: format!("{} APIs", f.name),
        description: format!("All API endpoints for {}", f.name),
    }));
    out
}

/// Resource body as JSON text. Unknown URIs read as an error object rather than failing.
#[must_use]
pub fn read_resource(catalog: &EndpointCatalog, uri: &str) -> String {
    let rendered = if uri == CATALOG_URI {
        serde_json::to_string_pretty(&CatalogOverview(catalog)).ok()
    } else {
        uri.strip_prefix(FEATURE_URI_PREFIX)
            .and_then(|name| catalog.feature(name))
            .and_then(|feature| serde_json::to_string_pretty(&feature.raw).ok())
    };
    rendered.unwrap_or_else(|| json!({"error": "Resource not found"}).to_string())
}

/// Feature → `{count, endpoints}` map that keeps catalog order.
struct CatalogOverview<'a>(&'a EndpointCatalog);

struct FeatureOverview<'a>(&'a Feature);

#[derive(Serialize)]
struct EndpointOverview<'a> {
    title: &'a str,
    method: &'a str,
    path: &'a str,
    summary: &'a str,
}

impl Serialize for CatalogOverview<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.endpoints.len()))?;
        for feature in self.0.features() {
            map.serialize_entry(&feature.name, &FeatureOverview(feature))?;
        }
        map.end()
    }
}

impl Serialize for FeatureOverview<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let endpoints: Vec<EndpointOverview<'_>> = self
            .0
            .endpoints
            .iter()
            .map(|ep| EndpointOverview {
                title: &ep.title,
                method: &ep.method,
                path: &ep.path,
                summary: ep.summary().unwrap_or_default(),
            })
            .collect();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("count", &self.0.endpoints.len())?;
        map.serialize_entry("endpoints", &endpoints)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn catalog() -> EndpointCatalog {
        let doc = json!({
            "endpoints": {
                "Zeta": [
                    {"title": "Z", "method": "GET", "path": "/z",
                     "spec": {"spec": {"summary": "Zed."}, "meta": {"servers": [{"url": "https://x"}]}}}
                ],
                "Alpha": [
                    {"title": "A", "method": "POST", "path": "/a"}
                ]
            }
        });
        EndpointCatalog::parse("inline", &doc.to_string()).expect("catalog")
    }

    #[test]
    fn lists_catalog_then_features_in_order() {
        let uris: Vec<_> = list_resources(&catalog()).into_iter().map(|r| r.uri).collect();
        assert_eq!(
            uris,
            vec![
                "webex://api/catalog",
                "webex://api/feature/Zeta",
                "webex://api/feature/Alpha"
            ]
        );
    }

    #[test]
    fn catalog_overview_keeps_feature_order() {
        let text = read_resource(&catalog(), CATALOG_URI);
        assert!(text.find("\"Zeta\"").expect("zeta") < text.find("\"Alpha\"").expect("alpha"));

        let v: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(v["Zeta"]["count"], 1);
        assert_eq!(
            v["Zeta"]["endpoints"][0],
            json!({"title": "Z", "method": "GET", "path": "/z", "summary": "Zed."})
        );
        assert_eq!(v["Alpha"]["endpoints"][0]["summary"], "");
    }

    #[test]
    fn feature_resource_is_raw_endpoint_list() {
        let v: Value =
            serde_json::from_str(&read_resource(&catalog(), "webex://api/feature/Zeta")).expect("json");
        assert_eq!(v[0]["title"], "Z");
        assert_eq!(v[0]["spec"]["meta"]["servers"][0]["url"], "https://x");
    }

    #[test]
    fn feature_resource_keeps_source_keys_and_order() {
        let endpoints = json!([{
            "title": "Search",
            "method": "POST",
            "path": "/search",
            "spec": {
                "spec": {
                    "parameters": [
                        {"name": "q", "in": "query", "example": "abc", "style": "form"},
                        {"name": "h"}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {
                            "type": "object",
                            "properties": {"zeta": {"type": "string"}, "alpha": {"type": "integer"}}
                        }}}
                    }
                },
                "meta": {"servers": [{"url": "https://x", "variables": {"v": 1}}]}
            }
        }]);
        let doc = json!({"endpoints": {"F": endpoints}});
        let catalog = EndpointCatalog::parse("inline", &doc.to_string()).expect("catalog");

        let text = read_resource(&catalog, "webex://api/feature/F");
        let v: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(v, doc["endpoints"]["F"]);
        assert!(text.find("\"zeta\"").expect("zeta") < text.find("\"alpha\"").expect("alpha"));
        assert!(!text.contains("unknown"));
    }

    #[test]
    fn unknown_uri_reads_as_error_object() {
        for uri in ["webex://api/feature/Nope", "file:///etc/passwd"] {
            let v: Value = serde_json::from_str(&read_resource(&catalog(), uri)).expect("json");
            assert_eq!(v, json!({"error": "Resource not found"}));
        }
    }
}
