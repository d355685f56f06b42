//! Helpers shared by the integration tests: child process cleanup, ports, readiness polling, and
//! a small endpoint catalog fixture.

use anyhow::Context as _;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::{Duration, Instant};

/// Kills the wrapped child when dropped, so a failing test doesn't leak a server process.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status (2xx/3xx).
///
/// # Errors
///
/// Returns an error if the timeout elapses before the endpoint returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// Three features, five endpoints, in the exported collection format.
///
/// The server URL points at a closed local port; tests must not depend on reaching it.
#[must_use]
pub fn sample_catalog() -> Value {
    let server = json!({"servers": [{"url": "http://127.0.0.1:9/v1/"}]});
    json!({
        "version": "1.0",
        "exported_at": "2025-01-15T10:00:00Z",
        "total_endpoints": 5,
        "endpoints": {
            "Locations": [
                {
                    "title": "Get Location Details",
                    "method": "GET",
                    "path": "/locations/{locationId}",
                    "spec": {
                        "spec": {
                            "summary": "Shows details for a location, by ID.",
                            "parameters": [
                                {"name": "locationId", "in": "path", "required": true,
                                 "schema": {"type": "string"}, "description": "Unique identifier for the location."},
                                {"name": "orgId", "in": "query", "schema": {"type": "string"}}
                            ]
                        },
                        "meta": server
                    }
                },
                {
                    "title": "List Locations",
                    "method": "GET",
                    "path": "/locations",
                    "spec": {"spec": {"summary": "List locations for an organization."}, "meta": server}
                }
            ],
            "People": [
                {
                    "title": "Create a Person",
                    "method": "POST",
                    "path": "/people",
                    "spec": {
                        "spec": {
                            "summary": "Create a new user account for a given organization.",
                            "requestBody": {"content": {"application/json": {"schema": {
                                "properties": {
                                    "emails": {"type": "array", "description": "Email addresses of the person."},
                                    "displayName": {"type": "string"}
                                },
                                "required": ["emails"]
                            }}}}
                        },
                        "meta": server
                    }
                },
                {
                    "title": "Delete a Person",
                    "method": "DELETE",
                    "path": "/people/{personId}",
                    "spec": {"spec": {"summary": "Remove a person from the system."}, "meta": server}
                }
            ],
            "Call Queue": [
                {
                    "title": "List Call Queues",
                    "method": "GET",
                    "path": "/telephony/config/queues",
                    "spec": {"spec": {"summary": "List all call queues for the organization."}, "meta": server}
                }
            ]
        }
    })
}

/// Write `value` as pretty JSON to `dir/name` and return the path.
///
/// # Errors
///
/// Returns an error if the file can't be written.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    let bytes = serde_json::to_vec_pretty(value).context("serialize fixture")?;
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
