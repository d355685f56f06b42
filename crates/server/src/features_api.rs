//! Feature enablement HTTP API.
//!
//! A thin read/write surface over the enablement file. The catalog and the file are re-read on
//! every request so the API always reflects what a fresh `serve` would load.

use crate::error::Result;
use axum::{
    Extension, Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use webex_catalog_tools::catalog::EndpointCatalog;
use webex_catalog_tools::enablement::{FeatureEnablement, enablement_stats, feature_summaries};

#[derive(Debug, Clone)]
pub struct FeaturesState {
    pub catalog_path: PathBuf,
    pub enablement_path: PathBuf,
}

impl FeaturesState {
    fn load(&self) -> webex_catalog_tools::error::Result<(EndpointCatalog, FeatureEnablement)> {
        let catalog = EndpointCatalog::load(&self.catalog_path)?;
        let enablement = FeatureEnablement::load(&self.enablement_path)?;
        Ok((catalog, enablement))
    }
}

pub fn router(state: Arc<FeaturesState>) -> Router {
    Router::new()
        .route("/api/features", get(list_features))
        .route("/api/save", post(save_features))
        .route("/api/stats", get(stats))
        .layer(Extension(state))
}

/// Serve the API on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    state: Arc<FeaturesState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Feature enablement API listening on http://{addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    tracing::error!("feature API request failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}

async fn list_features(Extension(state): Extension<Arc<FeaturesState>>) -> impl IntoResponse {
    match state.load() {
        Ok((catalog, enablement)) => Json(feature_summaries(&catalog, &enablement)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn save_features(
    Extension(state): Extension<Arc<FeaturesState>>,
    Json(enablement): Json<FeatureEnablement>,
) -> impl IntoResponse {
    if let Err(e) = enablement.save(&state.enablement_path) {
        return internal_error(e);
    }
    tracing::info!(
        "Saved feature filter: {} features enabled",
        enablement.enabled_feature_count()
    );
    Json(json!({ "success": true })).into_response()
}

async fn stats(Extension(state): Extension<Arc<FeaturesState>>) -> impl IntoResponse {
    match state.load() {
        Ok((catalog, enablement)) => Json(enablement_stats(&catalog, &enablement)).into_response(),
        Err(e) => internal_error(e),
    }
}
