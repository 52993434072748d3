use std::sync::Arc;

use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;
use crate::poll::engine::MarketPollEngine;
use sea_orm::DatabaseConnection;

/// Builds the Discord client with the command handler attached.
///
/// # Arguments
/// - `config` - Application configuration with the bot token
/// - `db` - Database connection for command handling
/// - `engine` - Poll engine shared with the scheduler
///
/// # Returns
/// - `Ok(Client)` - Configured client, not yet started
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(
    config: &Config,
    db: DatabaseConnection,
    engine: Arc<MarketPollEngine>,
) -> Result<Client, AppError> {
    // MESSAGE_CONTENT is a privileged intent - must be enabled in the
    // Discord Developer Portal for the bot application.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler { db, engine };

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    Ok(client)
}

/// Starts the Discord bot. Blocks until the bot shuts down, so call from
/// within a spawned task.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
