//! Catalog tool source: the list/call boundary the MCP server talks to.
//!
//! Everything below this layer returns `Result`; this is the one place where per-call errors are
//! turned into `Error: ...` tool results so the calling agent can read them.

use crate::catalog::EndpointCatalog;
use crate::compiler::{Invocation, ToolCompiler, compile};
use crate::config::{EngineConfig, Strategy};
use crate::enablement::FeatureEnablement;
use crate::error::{ErrorKind, Result};
use crate::resources;
use crate::router::Dispatcher;
use crate::search::search;
use rmcp::model::{CallToolResult, Content, JsonObject, Resource, Tool};
use std::path::Path;
use std::sync::Arc;
use webex_http_tools::runtime::{HttpTransport, ReqwestTransport};

/// Compiled tool set plus the dispatcher that executes it.
#[derive(Clone)]
pub struct CatalogToolSource {
    compiler: Arc<dyn ToolCompiler>,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for CatalogToolSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogToolSource")
            .field("strategy", &self.compiler.strategy())
            .field("tools", &self.compiler.descriptors().len())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl CatalogToolSource {
    /// Load the catalog (and, for the exhaustive strategy, the enablement file) and compile.
    ///
    /// # Errors
    ///
    /// Returns a startup error if the catalog is missing or malformed, or if the enablement file
    /// exists but is unreadable.
    pub fn load(catalog_path: &Path, enablement_path: &Path, config: &EngineConfig) -> Result<Self> {
        let catalog = Arc::new(EndpointCatalog::load(catalog_path)?);
        let enablement = match config.strategy {
            Strategy::Exhaustive => FeatureEnablement::load(enablement_path)?,
            Strategy::Generic => FeatureEnablement::permissive(),
        };
        Ok(Self::new(catalog, &enablement, config))
    }

    /// Build with the reqwest transport and the configured timeout.
    #[must_use]
    pub fn new(
        catalog: Arc<EndpointCatalog>,
        enablement: &FeatureEnablement,
        config: &EngineConfig,
    ) -> Self {
        Self::with_transport(
            catalog,
            enablement,
            config,
            Arc::new(ReqwestTransport::new(config.timeout)),
        )
    }

    #[must_use]
    pub fn with_transport(
        catalog: Arc<EndpointCatalog>,
        enablement: &FeatureEnablement,
        config: &EngineConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let compiler = compile(catalog, enablement, config);
        let dispatcher = Dispatcher::new(transport, config.bearer_token.clone());
        if !dispatcher.has_credential() {
            tracing::warn!(
                "{} not set; tools are listed but calls will fail",
                crate::router::ACCESS_TOKEN_ENV
            );
        }
        Self {
            compiler,
            dispatcher,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.compiler.strategy()
    }

    #[must_use]
    pub fn catalog(&self) -> &EndpointCatalog {
        self.compiler.catalog()
    }

    /// List the MCP `Tool`s exposed by this source.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.compiler
            .descriptors()
            .iter()
            .map(|d| d.to_tool())
            .collect()
    }

    /// Execute a tool call and render the outcome as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool or endpoint doesn't resolve, the arguments are malformed, no
    /// credential is configured, or the outbound call fails at the transport level.
    pub async fn try_call_tool(&self, name: &str, arguments: Option<JsonObject>) -> Result<String> {
        let invocation = self
            .compiler
            .resolve(name, arguments.unwrap_or_default())?;

        match invocation {
            Invocation::Search { query } => {
                let results = search(self.catalog(), &query);
                tracing::debug!(query = %query, total = results.total_found, "catalog search");
                Ok(serde_json::to_string_pretty(&results)?)
            }
            Invocation::Dispatch {
                feature,
                endpoint,
                arguments,
            } => {
                let result = self
                    .dispatcher
                    .dispatch(feature, endpoint, &arguments)
                    .await?;
                Ok(serde_json::to_string_pretty(&result)?)
            }
        }
    }

    /// Execute a tool call. Never fails: errors become an `Error: ...` text result with `isError`.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.try_call_tool(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                match e.kind() {
                    ErrorKind::Dispatch => tracing::error!(tool = %name, "API call failed: {e}"),
                    _ => tracing::warn!(tool = %name, "tool call rejected: {e}"),
                }
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    #[must_use]
    pub fn list_resources(&self) -> Vec<Resource> {
        resources::list_resources(self.catalog())
            .iter()
            .map(resources::CatalogResource::to_resource)
            .collect()
    }

    #[must_use]
    pub fn read_resource(&self, uri: &str) -> String {
        resources::read_resource(self.catalog(), uri)
    }
}
