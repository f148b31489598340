mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Target};
use futures::StreamExt;
use log::{LevelFilter, debug};

use publisher_console::app::{self, AppConfig};

use crate::cli::Cli;

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("publisher_console", LevelFilter::Debug)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();

    let mut config = AppConfig::from_environment().context("invalid configuration")?;
    if let Some(url) = &cli.server_url {
        config = config
            .with_server_url(url)
            .context("invalid --server-url")?;
    }
    if cli.demo {
        config = config.with_test_stubs(true);
    }

    let catalog = app::boot(&config).context("failed to start the catalog client")?;

    let mut busy = catalog.activity.observe();
    tokio::spawn(async move {
        while let Some(busy) = busy.next().await {
            debug!("[Console] busy = {}", busy);
        }
    });

    cli::run(cli.command, &catalog).await
}
