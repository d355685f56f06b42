#![allow(dead_code)]

use anyhow::Context as _;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout};

pub use webex_test_support::{KillOnDrop, pick_unused_port, sample_catalog, wait_http_ok, write_json};

pub const TIMEOUT: Duration = Duration::from_secs(10);

const BIN: &str = env!("CARGO_BIN_EXE_webex-mcp-server");

/// Catalog plus an enablement file that turns on Locations and People only.
pub fn write_fixtures(dir: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let catalog = write_json(dir, "catalog.json", &sample_catalog())?;
    let enablement = write_json(
        dir,
        "enabled_features.json",
        &json!({"Locations": true, "People": true, "Call Queue": false}),
    )?;
    Ok((catalog, enablement))
}

pub fn spawn_features_api(catalog: &Path, enablement: &Path, port: u16) -> anyhow::Result<Child> {
    Command::new(BIN)
        .arg("--catalog")
        .arg(catalog)
        .arg("--enabled-features")
        .arg(enablement)
        .arg("features")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .stdin(Stdio::null())
        .spawn()
        .context("spawn features api")
}

/// Line-delimited JSON-RPC client for the server's stdio transport.
pub struct StdioSession {
    _child: tokio::process::Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    /// Spawn the server and run the initialize handshake.
    pub async fn start(catalog: &Path, enablement: &Path, extra_args: &[&str]) -> anyhow::Result<Self> {
        let mut child = tokio::process::Command::new(BIN)
            .arg("--catalog")
            .arg(catalog)
            .arg("--enabled-features")
            .arg(enablement)
            .args(extra_args)
            .env_remove("WEBEX_ACCESS_TOKEN")
            .env_remove("WEBEX_MCP_MODE")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn stdio server")?;

        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;
        let mut session = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "webex-mcp-integration-tests", "version": "0"}
                }),
            )
            .await?;
        anyhow::ensure!(init.get("result").is_some(), "initialize failed: {init}");

        session
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    async fn send(&mut self, msg: &serde_json::Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(msg)?;
        line.push(b'\n');
        self.stdin.write_all(&line).await.context("write stdin")?;
        self.stdin.flush().await.context("flush stdin")?;
        Ok(())
    }

    /// Send a request and wait for the response carrying the same id.
    pub async fn request(
        &mut self,
        id: u64,
        method: &str,
        params: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        self.send(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await?;

        tokio::time::timeout(TIMEOUT, async {
            loop {
                let line = self
                    .stdout
                    .next_line()
                    .await?
                    .context("server closed stdout")?;
                let msg: serde_json::Value =
                    serde_json::from_str(&line).with_context(|| format!("parse line: {line}"))?;
                if msg.get("id") == Some(&json!(id)) {
                    return Ok(msg);
                }
            }
        })
        .await
        .context("timeout waiting for response")?
    }
}

/// `result.content[0].text` of a tools/call response.
pub fn tool_call_text(msg: &serde_json::Value) -> anyhow::Result<&str> {
    msg.get("result")
        .and_then(|r| r.get("content"))
        .and_then(serde_json::Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("text"))
        .and_then(serde_json::Value::as_str)
        .context("tools/call missing result.content[0].text")
}

pub fn tool_names(msg: &serde_json::Value) -> Vec<String> {
    msg["result"]["tools"]
        .as_array()
        .map(|tools| {
            tools
                .iter()
                .filter_map(|t| t["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
