//! Discord gateway event handler.

pub mod message;
pub mod ready;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;

use crate::poll::engine::MarketPollEngine;

/// Discord bot event handler.
pub struct Handler {
    pub db: DatabaseConnection,
    pub engine: Arc<MarketPollEngine>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.db, &self.engine, ctx, message).await;
    }
}
