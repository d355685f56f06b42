//! Argument routing and dispatch.
//!
//! Tool arguments arrive as one flat object. Routing splits them three ways:
//! - keys whose `{key}` token occurs in the path template are substituted into the path and never
//!   reach the query string or the body;
//! - declared `in: query` parameters go to the query string;
//! - everything else goes to the JSON body, declared or not.
//!
//! Both tool strategies share this classification.

use crate::catalog::{EndpointDefinition, ParameterLocation};
use crate::error::{CatalogToolsError, Result};
use rmcp::model::JsonObject;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use webex_http_tools::runtime::{DispatchResult, HttpTransport, OutboundRequest, value_to_string};

/// Environment variable the bearer credential is sourced from.
pub const ACCESS_TOKEN_ENV: &str = "WEBEX_ACCESS_TOKEN";

/// Arguments split by destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedArguments {
    /// Path template with every matching placeholder substituted.
    pub path: String,
    pub query: Vec<(String, Value)>,
    pub body: JsonObject,
}

/// Classify `arguments` for `endpoint`. `null` values count as absent.
#[must_use]
pub fn route_arguments(endpoint: &EndpointDefinition, arguments: &JsonObject) -> RoutedArguments {
    let present = || arguments.iter().filter(|(_, v)| !v.is_null());

    let mut path = endpoint.path.clone();
    for (key, value) in present() {
        if endpoint.has_placeholder(key) {
            path = path.replace(&format!("{{{key}}}"), &value_to_string(value));
        }
    }

    let mut query = Vec::new();
    let mut query_names: HashSet<&str> = HashSet::new();
    for param in &endpoint.operation().parameters {
        if param.location != ParameterLocation::Query || endpoint.has_placeholder(&param.name) {
            continue;
        }
        let Some(value) = arguments.get(&param.name).filter(|v| !v.is_null()) else {
            continue;
        };
        if query_names.insert(param.name.as_str()) {
            query.push((param.name.clone(), value.clone()));
        }
    }

    let body = present()
        .filter(|(key, _)| !endpoint.has_placeholder(key) && !query_names.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    RoutedArguments { path, query, body }
}

/// Build the outbound request for `endpoint` from routed arguments.
///
/// # Errors
///
/// Returns an error if the endpoint declares no server URL, or if its verb or URL are invalid.
pub fn build_request(
    feature: &str,
    endpoint: &EndpointDefinition,
    routed: RoutedArguments,
) -> Result<OutboundRequest> {
    let base_url = endpoint
        .base_url()
        .ok_or_else(|| CatalogToolsError::MissingBaseUrl {
            feature: feature.to_string(),
            title: endpoint.title.clone(),
        })?;

    let mut request = OutboundRequest::new(&endpoint.method, base_url, &routed.path)?;
    for (name, value) in &routed.query {
        request.push_query(name, value);
    }
    request.body = routed.body;
    Ok(request)
}

/// Sends routed calls with the configured bearer credential.
///
/// Holds no per-call state; clones share the transport.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    bearer_token: Option<String>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// An empty token is treated as no token.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, bearer_token: Option<String>) -> Self {
        Self {
            transport,
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Route `arguments` and perform the call.
    ///
    /// A non-2xx status is a successful dispatch; inspect `status_code`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogToolsError::MissingCredential`] without touching the network when no token
    /// is configured, and a dispatch error for transport failures or unparseable bodies.
    pub async fn dispatch(
        &self,
        feature: &str,
        endpoint: &EndpointDefinition,
        arguments: &JsonObject,
    ) -> Result<DispatchResult> {
        let Some(token) = self.bearer_token.as_deref() else {
            return Err(CatalogToolsError::MissingCredential {
                env_var: ACCESS_TOKEN_ENV.to_string(),
            });
        };

        let routed = route_arguments(endpoint, arguments);
        let request = build_request(feature, endpoint, routed)?;
        let result = self.transport.send(request, token).await?;
        if !result.is_success() {
            tracing::warn!(
                feature,
                endpoint = %endpoint.title,
                status = result.status_code,
                "endpoint returned a non-success status"
            );
        }
        Ok(result)
    }
}
