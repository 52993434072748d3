//! Poll run factory.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test poll runs.
///
/// Defaults to an open run between two single-asset bundles that became due
/// one minute ago.
pub struct PollRunFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    message_id: String,
    left_keys: Vec<String>,
    right_keys: Vec<String>,
    started_at: chrono::DateTime<Utc>,
    ends_at: chrono::DateTime<Utc>,
    closed_at: Option<chrono::DateTime<Utc>>,
}

impl<'a> PollRunFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            db,
            guild_id: guild_id.into(),
            channel_id: format!("9000{}", id),
            message_id: format!("5000{}", id),
            left_keys: vec![format!("LeftMon{}|M", id)],
            right_keys: vec![format!("RightMon{}|M", id)],
            started_at: now - Duration::minutes(121),
            ends_at: now - Duration::minutes(1),
            closed_at: None,
        }
    }

    pub fn sides(mut self, left_keys: Vec<String>, right_keys: Vec<String>) -> Self {
        self.left_keys = left_keys;
        self.right_keys = right_keys;
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn ends_at(mut self, ends_at: chrono::DateTime<Utc>) -> Self {
        self.ends_at = ends_at;
        self
    }

    pub fn closed_at(mut self, closed_at: Option<chrono::DateTime<Utc>>) -> Self {
        self.closed_at = closed_at;
        self
    }

    pub async fn build(self) -> Result<entity::poll_run::Model, DbErr> {
        let left_bundle = self.left_keys.join("+");
        let right_bundle = self.right_keys.join("+");
        let pair_key = if left_bundle <= right_bundle {
            format!("{}||{}", left_bundle, right_bundle)
        } else {
            format!("{}||{}", right_bundle, left_bundle)
        };

        entity::poll_run::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            message_id: ActiveValue::Set(self.message_id),
            pair_key: ActiveValue::Set(pair_key),
            left_keys: ActiveValue::Set(serde_json::to_string(&self.left_keys).unwrap()),
            right_keys: ActiveValue::Set(serde_json::to_string(&self.right_keys).unwrap()),
            started_at: ActiveValue::Set(self.started_at),
            ends_at: ActiveValue::Set(self.ends_at),
            closed_at: ActiveValue::Set(self.closed_at),
            votes_left: ActiveValue::Set(None),
            votes_right: ActiveValue::Set(None),
            result: ActiveValue::Set(None),
            affects_score: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open, already-due poll run for the guild.
pub async fn create_poll_run(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::poll_run::Model, DbErr> {
    PollRunFactory::new(db, guild_id).build().await
}
