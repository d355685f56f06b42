//! Tool compilation: turning the catalog into advertised tools and resolving calls back to it.
//!
//! Two strategies share the [`ToolCompiler`] seam:
//! - [`ExhaustiveCompiler`] advertises one tool per endpoint of every enabled feature;
//! - [`GenericCompiler`] advertises `search` and `execute` and resolves endpoints at call time.

use crate::catalog::{EndpointCatalog, EndpointDefinition};
use crate::config::{CollisionPolicy, EngineConfig, Strategy};
use crate::enablement::FeatureEnablement;
use crate::error::{CatalogToolsError, Result};
use crate::naming::{suffixed_tool_name, tool_name, truncate_chars};
use crate::schema::{InputSchema, PropertySchema, project_input_schema};
use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use webex_http_tools::semantics::annotations_for_endpoint;

pub const TOOL_DESCRIPTION_MAX: usize = 100;

pub const SEARCH_TOOL: &str = "search";
pub const EXECUTE_TOOL: &str = "execute";

/// An advertised tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub annotations: Option<ToolAnnotations>,
}

impl ToolDescriptor {
    fn for_endpoint(name: String, endpoint: &EndpointDefinition) -> Self {
        let description = endpoint.summary().unwrap_or(&endpoint.title);
        Self {
            name,
            description: truncate_chars(description, TOOL_DESCRIPTION_MAX).to_string(),
            input_schema: project_input_schema(endpoint.operation()),
            annotations: Some(annotations_for_endpoint(&endpoint.method, &endpoint.title)),
        }
    }

    /// MCP wire form.
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let mut tool = Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(self.input_schema.to_json_object()),
        );
        tool.annotations.clone_from(&self.annotations);
        tool
    }
}

/// What a tool call resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation<'a> {
    /// Call one endpoint with the given arguments.
    Dispatch {
        feature: &'a str,
        endpoint: &'a EndpointDefinition,
        arguments: JsonObject,
    },
    /// Keyword search over the catalog.
    Search { query: String },
}

/// A tool-set strategy over a loaded catalog.
pub trait ToolCompiler: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Advertised tools, in a stable order for a fixed catalog and enablement map.
    fn descriptors(&self) -> &[ToolDescriptor];

    /// Resolve a call by tool name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogToolsError::ToolNotFound`] for unknown names, and argument or lookup errors
    /// for strategies that resolve endpoints at call time.
    fn resolve(&self, name: &str, arguments: JsonObject) -> Result<Invocation<'_>>;

    fn catalog(&self) -> &EndpointCatalog;
}

/// Build the compiler selected by `config`.
#[must_use]
pub fn compile(
    catalog: Arc<EndpointCatalog>,
    enablement: &FeatureEnablement,
    config: &EngineConfig,
) -> Arc<dyn ToolCompiler> {
    match config.strategy {
        Strategy::Exhaustive => Arc::new(ExhaustiveCompiler::compile(
            catalog,
            enablement,
            config.collision_policy,
        )),
        Strategy::Generic => Arc::new(GenericCompiler::new(catalog)),
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    /// Position in `descriptors`.
    position: usize,
    feature: usize,
    endpoint: usize,
}

/// One tool per endpoint.
#[derive(Debug)]
pub struct ExhaustiveCompiler {
    catalog: Arc<EndpointCatalog>,
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, IndexEntry>,
}

impl ExhaustiveCompiler {
    /// Compile every endpoint of every enabled feature, in catalog order.
    #[must_use]
    pub fn compile(
        catalog: Arc<EndpointCatalog>,
        enablement: &FeatureEnablement,
        policy: CollisionPolicy,
    ) -> Self {
        let mut descriptors: Vec<ToolDescriptor> = Vec::new();
        let mut index: HashMap<String, IndexEntry> = HashMap::new();

        for (fi, feature) in catalog.features().enumerate() {
            if !enablement.is_enabled(&feature.name) {
                tracing::debug!(feature = %feature.name, "feature disabled; skipping");
                continue;
            }

            for (ei, endpoint) in feature.endpoints.iter().enumerate() {
                let base = tool_name(&feature.name, &endpoint.title);

                let Some(existing) = index.get(&base).copied() else {
                    index.insert(
                        base.clone(),
                        IndexEntry {
                            position: descriptors.len(),
                            feature: fi,
                            endpoint: ei,
                        },
                    );
                    descriptors.push(ToolDescriptor::for_endpoint(base, endpoint));
                    continue;
                };

                match policy {
                    CollisionPolicy::Overwrite => {
                        tracing::warn!(
                            tool = %base,
                            feature = %feature.name,
                            endpoint = %endpoint.title,
                            "tool name collision; later endpoint replaces earlier one"
                        );
                        descriptors[existing.position] =
                            ToolDescriptor::for_endpoint(base.clone(), endpoint);
                        index.insert(
                            base,
                            IndexEntry {
                                position: existing.position,
                                feature: fi,
                                endpoint: ei,
                            },
                        );
                    }
                    CollisionPolicy::Suffix => {
                        let mut counter = 2;
                        let name = loop {
                            let candidate = suffixed_tool_name(&base, counter);
                            if !index.contains_key(&candidate) {
                                break candidate;
                            }
                            counter += 1;
                        };
                        tracing::warn!(
                            tool = %base,
                            renamed = %name,
                            feature = %feature.name,
                            endpoint = %endpoint.title,
                            "tool name collision; renamed"
                        );
                        index.insert(
                            name.clone(),
                            IndexEntry {
                                position: descriptors.len(),
                                feature: fi,
                                endpoint: ei,
                            },
                        );
                        descriptors.push(ToolDescriptor::for_endpoint(name, endpoint));
                    }
                }
            }
        }

        tracing::info!(
            tools = descriptors.len(),
            endpoints = catalog.endpoint_count(),
            "compiled exhaustive tool set"
        );

        Self {
            catalog,
            descriptors,
            index,
        }
    }

    /// Feature name and endpoint behind a tool name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&str, &EndpointDefinition)> {
        let entry = self.index.get(name)?;
        let feature = self.catalog.endpoints.iter().nth(entry.feature)?;
        let endpoint = feature.endpoints.get(entry.endpoint)?;
        Some((feature.name.as_str(), endpoint))
    }
}

impl ToolCompiler for ExhaustiveCompiler {
    fn strategy(&self) -> Strategy {
        Strategy::Exhaustive
    }

    fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    fn resolve(&self, name: &str, arguments: JsonObject) -> Result<Invocation<'_>> {
        let (feature, endpoint) = self
            .lookup(name)
            .ok_or_else(|| CatalogToolsError::ToolNotFound(name.to_string()))?;
        Ok(Invocation::Dispatch {
            feature,
            endpoint,
            arguments,
        })
    }

    fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }
}

/// Two fixed tools over the whole catalog. Feature enablement does not apply.
#[derive(Debug)]
pub struct GenericCompiler {
    catalog: Arc<EndpointCatalog>,
    descriptors: Vec<ToolDescriptor>,
}

fn property(kind: &str, description: &str) -> PropertySchema {
    PropertySchema {
        kind: crate::catalog::SchemaType::Name(kind.to_string()),
        description: description.to_string(),
    }
}

impl GenericCompiler {
    #[must_use]
    pub fn new(catalog: Arc<EndpointCatalog>) -> Self {
        let search = ToolDescriptor {
            name: SEARCH_TOOL.to_string(),
            description: "Search Webex API endpoints by keyword to find the feature and title to execute"
                .to_string(),
            input_schema: InputSchema {
                properties: [(
                    "query".to_string(),
                    property("string", "Search term, e.g. 'user' or 'phone number'"),
                )]
                .into_iter()
                .collect(),
                required: vec!["query".to_string()],
            },
            annotations: Some(ToolAnnotations {
                title: Some("Search Webex APIs".to_string()),
                read_only_hint: Some(true),
                destructive_hint: Some(false),
                idempotent_hint: Some(true),
                open_world_hint: Some(false),
            }),
        };

        let execute = ToolDescriptor {
            name: EXECUTE_TOOL.to_string(),
            description:
                "Execute any Webex API endpoint. Provide the feature name, endpoint title, and parameters."
                    .to_string(),
            input_schema: InputSchema {
                properties: [
                    (
                        "feature".to_string(),
                        property("string", "Feature name, e.g. 'People' or 'Locations'"),
                    ),
                    (
                        "endpoint_title".to_string(),
                        property("string", "Exact endpoint title from the catalog"),
                    ),
                    (
                        "parameters".to_string(),
                        property("object", "Endpoint arguments as key-value pairs"),
                    ),
                ]
                .into_iter()
                .collect(),
                required: vec!["feature".to_string(), "endpoint_title".to_string()],
            },
            annotations: Some(ToolAnnotations {
                title: Some("Execute Webex API".to_string()),
                read_only_hint: None,
                destructive_hint: None,
                idempotent_hint: None,
                open_world_hint: Some(true),
            }),
        };

        tracing::info!(
            endpoints = catalog.endpoint_count(),
            "compiled generic tool set"
        );

        Self {
            catalog,
            descriptors: vec![search, execute],
        }
    }
}

/// String argument; missing and `null` read as `None`.
fn optional_str<'a>(arguments: &'a JsonObject, key: &str) -> Result<Option<&'a str>> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(CatalogToolsError::InvalidArguments(format!(
            "'{key}' must be a string"
        ))),
    }
}

impl ToolCompiler for GenericCompiler {
    fn strategy(&self) -> Strategy {
        Strategy::Generic
    }

    fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    fn resolve(&self, name: &str, mut arguments: JsonObject) -> Result<Invocation<'_>> {
        match name {
            SEARCH_TOOL => Ok(Invocation::Search {
                query: optional_str(&arguments, "query")?
                    .unwrap_or_default()
                    .to_string(),
            }),
            EXECUTE_TOOL => {
                let feature = optional_str(&arguments, "feature")?.unwrap_or_default();
                let title = optional_str(&arguments, "endpoint_title")?.unwrap_or_default();

                let (feature, endpoint) = self
                    .catalog
                    .find_endpoint(feature, title)
                    .ok_or_else(|| CatalogToolsError::EndpointNotFound {
                        feature: feature.to_string(),
                        title: title.to_string(),
                    })?;

                let arguments = match arguments.remove("parameters") {
                    None | Some(Value::Null) => JsonObject::new(),
                    Some(Value::Object(params)) => params,
                    Some(_) => {
                        return Err(CatalogToolsError::InvalidArguments(
                            "'parameters' must be an object".to_string(),
                        ));
                    }
                };

                Ok(Invocation::Dispatch {
                    feature: &feature.name,
                    endpoint,
                    arguments,
                })
            }
            other => Err(CatalogToolsError::ToolNotFound(other.to_string())),
        }
    }

    fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::TOOL_NAME_MAX;
    use serde_json::json;

    fn catalog(value: Value) -> Arc<EndpointCatalog> {
        Arc::new(EndpointCatalog::parse("inline", &value.to_string()).expect("catalog"))
    }

    fn two_features() -> Arc<EndpointCatalog> {
        catalog(json!({
            "endpoints": {
                "A": [
                    {"title": "List Things", "method": "GET", "path": "/a",
                     "spec": {"spec": {"summary": "List every thing."}}},
                    {"title": "Create Thing", "method": "POST", "path": "/a"}
                ],
                "B": [
                    {"title": "b1", "method": "GET", "path": "/b/1"},
                    {"title": "b2", "method": "PUT", "path": "/b/2"},
                    {"title": "b3", "method": "DELETE", "path": "/b/3"}
                ]
            }
        }))
    }

    fn colliding() -> Arc<EndpointCatalog> {
        catalog(json!({
            "endpoints": {
                "People": [
                    {"title": "List People", "method": "GET", "path": "/people"},
                    {"title": "List  People!", "method": "GET", "path": "/people/v2"},
                    {"title": "Other", "method": "GET", "path": "/other"}
                ]
            }
        }))
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn enablement_map_filters_features() {
        let map: FeatureEnablement = [("A".to_string(), true), ("B".to_string(), false)]
            .into_iter()
            .collect();
        let compiler = ExhaustiveCompiler::compile(two_features(), &map, CollisionPolicy::Overwrite);

        assert_eq!(compiler.descriptors().len(), 2);
        for d in compiler.descriptors() {
            assert!(d.name.starts_with("a_"), "{}", d.name);
            let (feature, _) = compiler.lookup(&d.name).expect("indexed");
            assert_eq!(feature, "A");
        }
    }

    #[test]
    fn empty_map_includes_everything_in_catalog_order() {
        let compiler = ExhaustiveCompiler::compile(
            two_features(),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Overwrite,
        );
        let names: Vec<_> = compiler.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["a_list_things", "a_create_thing", "b_b1", "b_b2", "b_b3"]
        );
    }

    #[test]
    fn descriptor_carries_summary_schema_and_annotations() {
        let compiler = ExhaustiveCompiler::compile(
            two_features(),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Overwrite,
        );
        let list = &compiler.descriptors()[0];
        assert_eq!(list.description, "List every thing.");
        let hints = list.annotations.as_ref().expect("annotations");
        assert_eq!(hints.read_only_hint, Some(true));

        // No summary: the title stands in.
        let create = &compiler.descriptors()[1];
        assert_eq!(create.description, "Create Thing");

        let tool = list.to_tool();
        assert_eq!(tool.name, "a_list_things");
        assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
    }

    #[test]
    fn long_names_and_descriptions_are_capped() {
        let long = "Extremely Long Title ".repeat(10);
        let compiler = ExhaustiveCompiler::compile(
            catalog(json!({
                "endpoints": {
                    "A Feature Name That Goes On And On": [
                        {"title": long, "method": "GET", "path": "/x",
                         "spec": {"spec": {"summary": "s".repeat(300)}}}
                    ]
                }
            })),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Overwrite,
        );
        let d = &compiler.descriptors()[0];
        assert!(d.name.chars().count() <= TOOL_NAME_MAX);
        assert_eq!(d.description.chars().count(), TOOL_DESCRIPTION_MAX);
    }

    #[test]
    fn overwrite_policy_keeps_last_endpoint_at_first_position() {
        let compiler = ExhaustiveCompiler::compile(
            colliding(),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Overwrite,
        );
        let names: Vec<_> = compiler.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["people_list_people", "people_other"]);

        let (_, endpoint) = compiler.lookup("people_list_people").expect("indexed");
        assert_eq!(endpoint.path, "/people/v2");
    }

    #[test]
    fn suffix_policy_keeps_both_endpoints() {
        let compiler = ExhaustiveCompiler::compile(
            colliding(),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Suffix,
        );
        let names: Vec<_> = compiler.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["people_list_people", "people_list_people_2", "people_other"]
        );
        assert_eq!(
            compiler.lookup("people_list_people").expect("first").1.path,
            "/people"
        );
        assert_eq!(
            compiler.lookup("people_list_people_2").expect("second").1.path,
            "/people/v2"
        );
    }

    #[test]
    fn exhaustive_resolve_unknown_tool() {
        let compiler = ExhaustiveCompiler::compile(
            two_features(),
            &FeatureEnablement::permissive(),
            CollisionPolicy::Overwrite,
        );
        let err = compiler.resolve("nope", JsonObject::new()).unwrap_err();
        assert!(matches!(err, CatalogToolsError::ToolNotFound(ref n) if n == "nope"));

        let ok = compiler
            .resolve("b_b2", args(json!({"x": 1})))
            .expect("resolves");
        let Invocation::Dispatch {
            feature,
            endpoint,
            arguments,
        } = ok
        else {
            panic!("expected dispatch");
        };
        assert_eq!(feature, "B");
        assert_eq!(endpoint.title, "b2");
        assert_eq!(Value::Object(arguments), json!({"x": 1}));
    }

    #[test]
    fn generic_has_two_fixed_tools_regardless_of_enablement() {
        let map: FeatureEnablement = [("A".to_string(), false)].into_iter().collect();
        let config = EngineConfig {
            strategy: Strategy::Generic,
            ..EngineConfig::default()
        };
        let compiler = compile(two_features(), &map, &config);
        assert_eq!(compiler.strategy(), Strategy::Generic);

        let names: Vec<_> = compiler.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec![SEARCH_TOOL, EXECUTE_TOOL]);

        let execute = compiler.descriptors()[1].input_schema.to_json_object();
        assert_eq!(
            Value::Object(execute),
            json!({
                "type": "object",
                "properties": {
                    "endpoint_title": {"type": "string", "description": "Exact endpoint title from the catalog"},
                    "feature": {"type": "string", "description": "Feature name, e.g. 'People' or 'Locations'"},
                    "parameters": {"type": "object", "description": "Endpoint arguments as key-value pairs"}
                },
                "required": ["feature", "endpoint_title"]
            })
        );

        // Disabled feature A is still reachable.
        let inv = compiler
            .resolve(
                EXECUTE_TOOL,
                args(json!({"feature": "A", "endpoint_title": "List Things"})),
            )
            .expect("resolves");
        assert!(matches!(
            inv,
            Invocation::Dispatch { feature: "A", ref arguments, .. } if arguments.is_empty()
        ));
    }

    #[test]
    fn generic_execute_argument_errors() {
        let compiler = GenericCompiler::new(two_features());

        let err = compiler
            .resolve(
                EXECUTE_TOOL,
                args(json!({"feature": "A", "endpoint_title": "Missing"})),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Endpoint 'Missing' not found in feature 'A'");

        let err = compiler
            .resolve(EXECUTE_TOOL, JsonObject::new())
            .unwrap_err();
        assert!(matches!(err, CatalogToolsError::EndpointNotFound { .. }));

        let err = compiler
            .resolve(
                EXECUTE_TOOL,
                args(json!({"feature": "A", "endpoint_title": "List Things", "parameters": [1]})),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogToolsError::InvalidArguments(_)));

        let err = compiler
            .resolve(EXECUTE_TOOL, args(json!({"feature": 3})))
            .unwrap_err();
        assert!(matches!(err, CatalogToolsError::InvalidArguments(_)));
    }

    #[test]
    fn generic_search_defaults_to_empty_query() {
        let compiler = GenericCompiler::new(two_features());
        assert_eq!(
            compiler.resolve(SEARCH_TOOL, JsonObject::new()).expect("search"),
            Invocation::Search {
                query: String::new()
            }
        );
        assert!(matches!(
            compiler.resolve("webex_api_call", JsonObject::new()),
            Err(CatalogToolsError::ToolNotFound(_))
        ));
    }
}
