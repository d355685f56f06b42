//! MCP server surface over a [`CatalogToolSource`].

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListResourcesResult, ListToolsResult,
    PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::handler::server::ServerHandler;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use webex_catalog_tools::config::Strategy;
use webex_catalog_tools::runtime::CatalogToolSource;

const EXHAUSTIVE_INSTRUCTIONS: &str = "Each tool calls one Webex API endpoint. Path placeholders, \
     declared query parameters and body fields are all passed as flat arguments. Results are JSON \
     with `status_code` and `body`; a non-2xx status is reported, not raised.";

const GENERIC_INSTRUCTIONS: &str = "Use `search` to find an endpoint by keyword, then `execute` \
     with its `feature` and exact `endpoint_title`, passing endpoint arguments in `parameters`. \
     Results are JSON with `status_code` and `body`.";

#[derive(Debug, Clone)]
pub struct WebexMcpServer {
    source: CatalogToolSource,
}

impl WebexMcpServer {
    #[must_use]
    pub fn new(source: CatalogToolSource) -> Self {
        Self { source }
    }
}

impl ServerHandler for WebexMcpServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = match self.source.strategy() {
            Strategy::Exhaustive => EXHAUSTIVE_INSTRUCTIONS,
            Strategy::Generic => GENERIC_INSTRUCTIONS,
        };
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Webex API".to_string()),
                ..Default::default()
            },
            instructions: Some(instructions.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.source.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tools/call");
        Ok(self
            .source
            .call_tool(&request.name, request.arguments)
            .await)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.source.list_resources(),
            ..Default::default()
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.source.read_resource(&request.uri);
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
