//! Error types for `webex-catalog-tools`.

use thiserror::Error;
use webex_http_tools::runtime::HttpToolsError;

/// Main error type for catalog tooling.
#[derive(Error, Debug)]
pub enum CatalogToolsError {
    #[error("failed to read endpoint catalog '{path}': {source}")]
    CatalogReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse endpoint catalog '{path}': {source}")]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read feature enablement file '{path}': {source}")]
    EnablementReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feature enablement file '{path}': {source}")]
    EnablementParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write feature enablement file '{path}': {source}")]
    EnablementWriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No bearer credential configured.
    #[error("{env_var} not set")]
    MissingCredential { env_var: String },

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Endpoint '{title}' not found in feature '{feature}'")]
    EndpointNotFound { feature: String, title: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Endpoint '{title}' in feature '{feature}' has no server URL")]
    MissingBaseUrl { feature: String, title: String },

    /// Transport failure or unparseable response body.
    #[error(transparent)]
    Dispatch(#[from] HttpToolsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used by callers that only care about how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Catalog or enablement data could not be loaded; the process must not serve.
    Startup,
    /// No credential configured.
    Auth,
    /// Tool name or feature+title did not resolve.
    NotFound,
    InvalidArguments,
    /// The outbound call failed.
    Dispatch,
}

impl CatalogToolsError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CatalogReadFile { .. }
            | Self::CatalogParse { .. }
            | Self::EnablementReadFile { .. }
            | Self::EnablementParse { .. }
            | Self::EnablementWriteFile { .. } => ErrorKind::Startup,
            Self::MissingCredential { .. } => ErrorKind::Auth,
            Self::ToolNotFound(_) | Self::EndpointNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::MissingBaseUrl { .. } | Self::Dispatch(_) | Self::Json(_) => ErrorKind::Dispatch,
        }
    }
}

/// Result type alias for catalog tooling operations.
pub type Result<T> = std::result::Result<T, CatalogToolsError>;
