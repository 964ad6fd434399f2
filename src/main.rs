mod config;
mod error;
mod models;
mod places;
mod seeder;
mod store;

use anyhow::Context;
use clap::Parser;
use config::{Cli, Config};
use places::PlacesClient;
use seeder::Seeder;
use store::{SpotStore, SqliteSpotStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let config =
        Config::resolve(cli, |var| std::env::var(var).ok()).context("Configuration error")?;

    info!("📍 Spot seeder");
    info!(
        "Searching {:.4},{:.4} within {} m, up to {} page(s)",
        config.seeder.query.latitude,
        config.seeder.query.longitude,
        config.seeder.query.radius,
        config.seeder.pages
    );

    let store = SqliteSpotStore::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    store.migrate().await.context("Failed to create spots table")?;

    let client =
        PlacesClient::new(config.api_key.clone()).context("Failed to create HTTP client")?;
    let seeder = Seeder::new(client, store, config.seeder);

    let summary = seeder.run().await.context("Seeding failed")?;

    let total = seeder.store().count().await.context("Failed to count spots")?;

    println!(
        "✅ Done: {} created, {} skipped ({} page(s), {} spots in database)",
        summary.created, summary.skipped, summary.pages, total
    );

    Ok(())
}
