//! Endpoint catalog -> MCP tooling.
//!
//! Loads an exported endpoint catalog, compiles it into MCP tools (one per endpoint, or a generic
//! search/execute pair), and routes tool calls to the remote HTTP API.
//!
//! It contains no transport/session logic; the server crate owns the MCP protocol surface.

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod enablement;
pub mod error;
pub mod naming;
pub mod resources;
pub mod router;
pub mod runtime;
pub mod schema;
pub mod search;
