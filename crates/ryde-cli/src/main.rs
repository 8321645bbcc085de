#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context as _;
use clap::Parser;
use ryde_client_core::{configuration::get_configuration, Client, MemoryStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ryde_cli::cli::Cli::parse();

    if let Err(e) = ryde_cli::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let mut configuration = get_configuration().context("failed to read configuration")?;
    if let Some(api_url) = args.api_url {
        configuration.api.base_url = api_url.trim_end_matches('/').to_string();
    }
    tracing::info!(base_url = %configuration.api.base_url, "starting ryde cli");
    let client = Client::from_configuration(&configuration, MemoryStorage::new());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    ryde_cli::repl::run(&client, stdin).await?;
    Ok(())
}
