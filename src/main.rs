mod bot;
mod config;
mod data;
mod error;
mod market;
mod model;
mod poll;
mod startup;
mod util;

use std::sync::Arc;

use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use crate::bot::platform::DiscordPlatform;
use crate::config::Config;
use crate::error::AppError;
use crate::poll::engine::MarketPollEngine;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting marketboard");

    // The engine posts through its own REST client; the gateway client owns
    // a separate one.
    let platform = Arc::new(DiscordPlatform::new(Arc::new(Http::new(
        &config.discord_bot_token,
    ))));
    let engine = Arc::new(MarketPollEngine::new(
        db.clone(),
        platform,
        crate::market::catalog::CatalogCache::new(config.catalog_sources()),
    ));

    // Start the Discord bot in a separate task
    let client = bot::start::init_bot(&config, db, engine.clone()).await?;
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    // Start the market poll scheduler
    let scheduler_engine = engine.clone();
    tokio::spawn(async move {
        if let Err(e) = poll::scheduler::start_scheduler(scheduler_engine).await {
            tracing::error!("Market poll scheduler error: {}", e);
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
