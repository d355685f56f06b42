use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use webex_catalog_tools::config::{CollisionPolicy, EngineConfig, Strategy};

/// Log output format.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line interface for `webex-mcp-server`.
#[derive(Debug, Parser)]
#[command(
    name = "webex-mcp-server",
    version,
    about = "Expose the Webex API catalog as MCP tools"
)]
pub struct Cli {
    /// Exported endpoint catalog (JSON).
    #[arg(
        long,
        global = true,
        env = "WEBEX_MCP_CATALOG",
        default_value = "webex_api_collection.json",
        value_name = "PATH"
    )]
    pub catalog: PathBuf,

    /// Feature enablement map (JSON object of feature -> bool). A missing file enables everything.
    #[arg(
        long,
        global = true,
        env = "WEBEX_MCP_ENABLED_FEATURES",
        default_value = "enabled_features.json",
        value_name = "PATH"
    )]
    pub enabled_features: PathBuf,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for `serve`. Global so they may appear before or after the subcommand.
    #[command(flatten)]
    pub serve: ServeArgs,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve MCP over stdio (default).
    Serve,
    /// Run the feature enablement HTTP API.
    Features(FeaturesArgs),
    /// Load the catalog and print a summary.
    Check,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Tool strategy: `exhaustive` (one tool per endpoint) or `generic` (search + execute).
    #[arg(long, global = true, env = "WEBEX_MCP_MODE", default_value_t = Strategy::Exhaustive)]
    pub mode: Strategy,

    /// Tool name collision handling: `overwrite` or `suffix`.
    #[arg(long, global = true, default_value_t = CollisionPolicy::Overwrite)]
    pub collision_policy: CollisionPolicy,

    /// Outbound call timeout in seconds.
    #[arg(long, global = true, default_value_t = 30, value_name = "SECS")]
    pub timeout_secs: u64,

    /// Bearer token for the Webex API.
    #[arg(long, global = true, env = "WEBEX_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl ServeArgs {
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            strategy: self.mode,
            collision_policy: self.collision_policy,
            timeout: Duration::from_secs(self.timeout_secs),
            bearer_token: self.access_token.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FeaturesArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}
