//! Webex MCP server: CLI, logging, the MCP stdio surface, and the feature enablement API.

pub mod check;
pub mod cli;
pub mod error;
pub mod features_api;
pub mod handler;
pub mod logging;

use crate::cli::{FeaturesArgs, ServeArgs};
use crate::error::{Result, ServerError};
use crate::features_api::FeaturesState;
use crate::handler::WebexMcpServer;
use rmcp::ServiceExt as _;
use std::path::Path;
use std::sync::Arc;
use webex_catalog_tools::runtime::CatalogToolSource;

/// Load the catalog and serve MCP over stdio until the client disconnects.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or the MCP session fails to start.
pub async fn run_serve(catalog: &Path, enabled_features: &Path, args: &ServeArgs) -> Result<()> {
    let config = args.engine_config();
    tracing::info!(
        mode = %config.strategy,
        collision_policy = %config.collision_policy,
        timeout_secs = config.timeout.as_secs(),
        "starting MCP server"
    );
    let source = CatalogToolSource::load(catalog, enabled_features, &config)?;
    tracing::info!("Registered {} tools", source.list_tools().len());

    let running = WebexMcpServer::new(source)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| ServerError::Serve(format!("failed to start server: {e}")))?;
    let reason = running
        .waiting()
        .await
        .map_err(|e| ServerError::Serve(format!("server task ended: {e}")))?;
    tracing::info!("MCP session closed: {reason:?}");
    Ok(())
}

/// Run the feature enablement API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address can't be bound or the server fails.
pub async fn run_features(catalog: &Path, enabled_features: &Path, args: &FeaturesArgs) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .map_err(|e| ServerError::Config(format!("failed to bind {}: {e}", args.bind)))?;
    let state = Arc::new(FeaturesState {
        catalog_path: catalog.to_path_buf(),
        enablement_path: enabled_features.to_path_buf(),
    });
    features_api::serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutting down feature API");
    })
    .await
}
