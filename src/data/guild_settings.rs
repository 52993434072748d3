use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::model::guild_settings::{
    GuildSettings, UpdateGuildSettingsParam, DEFAULT_CADENCE_MINUTES, DEFAULT_MIN_VOTES,
    DEFAULT_PAIR_COOLDOWN_DAYS, DEFAULT_POLL_MINUTES,
};

pub struct GuildSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the settings row for a guild, inserting the defaults on first
    /// access. New guilds start disabled with no channel configured.
    ///
    /// # Returns
    /// - `Ok(GuildSettings)`: Existing or freshly defaulted settings
    /// - `Err(DbErr)`: Database error
    pub async fn get_or_default(&self, guild_id: &str) -> Result<GuildSettings, DbErr> {
        let existing = entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id))
            .one(self.db)
            .await?;

        if let Some(model) = existing {
            return Ok(GuildSettings::from_entity(model));
        }

        let now = Utc::now();
        let created = entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            enabled: ActiveValue::Set(false),
            channel_id: ActiveValue::Set(None),
            cadence_minutes: ActiveValue::Set(DEFAULT_CADENCE_MINUTES),
            poll_minutes: ActiveValue::Set(DEFAULT_POLL_MINUTES),
            pair_cooldown_days: ActiveValue::Set(DEFAULT_PAIR_COOLDOWN_DAYS),
            min_votes: ActiveValue::Set(DEFAULT_MIN_VOTES),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(GuildSettings::from_entity(created))
    }

    /// Applies a patch to a guild's settings, creating the row first if the
    /// guild was never configured.
    pub async fn update(
        &self,
        guild_id: &str,
        param: UpdateGuildSettingsParam,
    ) -> Result<GuildSettings, DbErr> {
        self.get_or_default(guild_id).await?;

        let model = entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id))
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("guild_settings {}", guild_id)))?;

        let mut active: entity::guild_settings::ActiveModel = model.into();
        if let Some(enabled) = param.enabled {
            active.enabled = ActiveValue::Set(enabled);
        }
        if let Some(channel_id) = param.channel_id {
            active.channel_id = ActiveValue::Set(Some(channel_id));
        }
        if let Some(cadence_minutes) = param.cadence_minutes {
            active.cadence_minutes = ActiveValue::Set(cadence_minutes);
        }
        if let Some(poll_minutes) = param.poll_minutes {
            active.poll_minutes = ActiveValue::Set(poll_minutes);
        }
        if let Some(pair_cooldown_days) = param.pair_cooldown_days {
            active.pair_cooldown_days = ActiveValue::Set(pair_cooldown_days);
        }
        if let Some(min_votes) = param.min_votes {
            active.min_votes = ActiveValue::Set(min_votes);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;
        Ok(GuildSettings::from_entity(updated))
    }

    /// Lists guilds with market polls enabled and a target channel set.
    pub async fn list_enabled(&self) -> Result<Vec<GuildSettings>, DbErr> {
        let models = entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::Enabled.eq(true))
            .filter(entity::guild_settings::Column::ChannelId.is_not_null())
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(GuildSettings::from_entity).collect())
    }
}

#[cfg(test)]
mod test;
