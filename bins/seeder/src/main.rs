//! Seeds the static categories every user sees.
//!
//! Safe to run repeatedly: categories that already exist are skipped.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walletify_db::CategoryRepository;
use walletify_db::repositories::DEFAULT_STATIC_CATEGORIES;
use walletify_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walletify=info,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = walletify_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let inserted = CategoryRepository::new(db)
        .seed_static(&DEFAULT_STATIC_CATEGORIES)
        .await?;

    info!(
        inserted,
        skipped = DEFAULT_STATIC_CATEGORIES.len() - inserted,
        "Static categories seeded"
    );
    Ok(())
}
