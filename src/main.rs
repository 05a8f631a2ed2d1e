use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use villa_api::{http, Config, VillaService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = config.open_store().context("failed to open villa store")?;
    let service = Arc::new(VillaService::new(store));

    info!(addr = %config.bind, "villa api listening");
    http::serve(service, config.bind)
        .await
        .with_context(|| format!("server on {} failed", config.bind))
}
