//! Guild settings factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test guild settings rows.
///
/// Defaults to an enabled guild with a configured channel, ready for
/// scheduler and posting tests; flip fields as needed.
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    enabled: bool,
    channel_id: Option<String>,
    cadence_minutes: i32,
    poll_minutes: i32,
    pair_cooldown_days: i32,
    min_votes: i32,
}

impl<'a> GuildSettingsFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        let id = next_id();
        Self {
            db,
            guild_id: guild_id.into(),
            enabled: true,
            channel_id: Some(format!("9000{}", id)),
            cadence_minutes: 720,
            poll_minutes: 120,
            pair_cooldown_days: 5,
            min_votes: 5,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn channel_id(mut self, channel_id: Option<String>) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn cadence_minutes(mut self, cadence_minutes: i32) -> Self {
        self.cadence_minutes = cadence_minutes;
        self
    }

    pub fn poll_minutes(mut self, poll_minutes: i32) -> Self {
        self.poll_minutes = poll_minutes;
        self
    }

    pub fn pair_cooldown_days(mut self, pair_cooldown_days: i32) -> Self {
        self.pair_cooldown_days = pair_cooldown_days;
        self
    }

    pub fn min_votes(mut self, min_votes: i32) -> Self {
        self.min_votes = min_votes;
        self
    }

    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        let now = Utc::now();
        entity::guild_settings::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            enabled: ActiveValue::Set(self.enabled),
            channel_id: ActiveValue::Set(self.channel_id),
            cadence_minutes: ActiveValue::Set(self.cadence_minutes),
            poll_minutes: ActiveValue::Set(self.poll_minutes),
            pair_cooldown_days: ActiveValue::Set(self.pair_cooldown_days),
            min_votes: ActiveValue::Set(self.min_votes),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates enabled settings with a default channel for the guild.
pub async fn create_settings(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db, guild_id).build().await
}
