//! Outbound HTTP primitives for the Webex MCP server.
//!
//! This crate knows nothing about the endpoint catalog: it sends already classified requests,
//! attaches the bearer credential and normalizes responses. Tool compilation and argument routing
//! live in `webex-catalog-tools`.

pub mod runtime;
pub mod safety;
pub mod semantics;
