//! Catalog - interactive library catalog manager

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_core::{config::AppConfig, services::Services, shell::Shell};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing; logs go to stderr so the menu keeps stdout
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("catalog_core={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    tracing::info!(
        "Starting catalog v{} (id strategy: {:?})",
        env!("CARGO_PKG_VERSION"),
        config.catalog.id_strategy
    );

    let services = Services::new(&config.catalog);
    let stdin = io::stdin();
    let mut shell = Shell::new(services, stdin.lock(), io::stdout());
    shell.run()?;

    tracing::info!("Catalog closed");
    Ok(())
}
