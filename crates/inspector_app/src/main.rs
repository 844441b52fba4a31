mod config;

use anyhow::Context;
use clap::Parser;
use inspector_logging::inspector_info;
use inspector_proxy::ProxyServer;

use crate::config::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    inspector_logging::initialize(cli.log.into(), cli.log_level(), &cli.log_file);

    let config = cli.server_config()?;
    inspector_info!(
        "Starting scrape-inspector proxy on {} (relay {})",
        config.bind,
        config.relay_base
    );
    let server = ProxyServer::bind(config).context("failed to start proxy server")?;
    server.run();
    Ok(())
}
