use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::scheduler_log::CreateSchedulerLogParam;

pub struct SchedulerLogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SchedulerLogRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records one posting attempt, whatever its outcome.
    pub async fn create(&self, param: CreateSchedulerLogParam) -> Result<(), DbErr> {
        entity::scheduler_log::ActiveModel {
            guild_id: ActiveValue::Set(param.guild_id),
            run_at: ActiveValue::Set(param.run_at),
            status: ActiveValue::Set(param.status.as_str().to_string()),
            reason: ActiveValue::Set(param.reason),
            pair_key: ActiveValue::Set(param.pair_key),
            message_id: ActiveValue::Set(param.message_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        Ok(())
    }

    /// Time of the most recent posting attempt for a guild. The cadence
    /// check measures from this, so skipped attempts also push the next one
    /// out by a full cadence.
    pub async fn last_run_at(&self, guild_id: &str) -> Result<Option<DateTime<Utc>>, DbErr> {
        let model = entity::prelude::SchedulerLog::find()
            .filter(entity::scheduler_log::Column::GuildId.eq(guild_id))
            .order_by_desc(entity::scheduler_log::Column::RunAt)
            .one(self.db)
            .await?;

        Ok(model.map(|m| m.run_at))
    }
}

#[cfg(test)]
mod test;
