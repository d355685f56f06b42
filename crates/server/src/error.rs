//! Error types for the MCP server binary.

use thiserror::Error;
use webex_catalog_tools::error::CatalogToolsError;

/// Main error type for the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (bad log filter, unusable bind address)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog or enablement data could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogToolsError),

    /// The MCP session ended abnormally
    #[error("MCP serve error: {0}")]
    Serve(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
