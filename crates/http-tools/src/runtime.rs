//! Outbound HTTP dispatch.
//!
//! A tool invocation ends up here as a fully classified [`OutboundRequest`]. The transport attaches
//! the bearer credential, applies the per-call timeout and normalizes whatever comes back into a
//! [`DispatchResult`]. Non-2xx statuses are results, not errors: the calling agent is expected to
//! look at `status_code` itself.

use crate::safety::{redact_url, sanitize_reqwest_error};
use crate::semantics::parse_method;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-call timeout used when the caller doesn't configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum HttpToolsError {
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("invalid request URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("http transport error: {0}")]
    Transport(String),
    #[error("invalid JSON in response body (HTTP {status}): {message}")]
    InvalidResponseBody { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, HttpToolsError>;

impl From<reqwest::Error> for HttpToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// A request whose arguments have already been split into path, query and body.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub body: Map<String, Value>,
}

impl OutboundRequest {
    /// Build a request from a catalog verb, a server base URL and an already substituted path.
    ///
    /// A trailing slash on `base_url` is dropped before the path is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the verb is not an HTTP method token or the joined URL doesn't parse.
    pub fn new(verb: &str, base_url: &str, path: &str) -> Result<Self> {
        let method = parse_method(verb).ok_or_else(|| HttpToolsError::InvalidMethod(verb.into()))?;
        let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
        let url = Url::parse(&raw).map_err(|e| HttpToolsError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            method,
            url,
            query: Vec::new(),
            body: Map::new(),
        })
    }

    /// Append one argument to the query string.
    ///
    /// Arrays become repeated keys, objects are sent as their JSON text.
    pub fn push_query(&mut self, name: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    self.query.push((name.to_string(), value_to_string(item)));
                }
            }
            other => self.query.push((name.to_string(), value_to_string(other))),
        }
    }
}

/// Normalized outcome of one outbound call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub status_code: u16,
    pub body: Value,
}

impl DispatchResult {
    /// Normalize a raw response body: empty means `{}`, anything else must be JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty body is not valid JSON.
    pub fn from_response_bytes(status_code: u16, bytes: &[u8]) -> Result<Self> {
        let body = if bytes.is_empty() {
            json!({})
        } else {
            serde_json::from_slice(bytes).map_err(|e| HttpToolsError::InvalidResponseBody {
                status: status_code,
                message: e.to_string(),
            })?
        };
        Ok(Self { status_code, body })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// The request/response primitive the dispatcher runs on.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request with `bearer_token` attached.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failures, timeouts, or an unparseable non-empty body.
    async fn send(&self, request: OutboundRequest, bearer_token: &str) -> Result<DispatchResult>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest, bearer_token: &str) -> Result<DispatchResult> {
        let OutboundRequest {
            method,
            url,
            query,
            body,
        } = request;
        let target = redact_url(&url);

        let mut builder = self
            .client
            .request(method.clone(), url)
            .bearer_auth(bearer_token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if !body.is_empty() {
            builder = builder.json(&body);
        }

        tracing::info!("Executing {method} {target}");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        tracing::info!("Action: {method} {target} | Status: {status}");

        DispatchResult::from_response_bytes(status, &bytes)
    }
}

/// Convert a JSON value to a string for URL path/query parameters.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
