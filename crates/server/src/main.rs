use clap::Parser as _;
use webex_mcp_server::cli::{Cli, Command};
use webex_mcp_server::{check, logging, run_features, run_serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    match cli.selected_command() {
        Command::Serve => run_serve(&cli.catalog, &cli.enabled_features, &cli.serve).await?,
        Command::Features(args) => run_features(&cli.catalog, &cli.enabled_features, &args).await?,
        Command::Check => check::run(&cli.catalog)?,
    }
    Ok(())
}
