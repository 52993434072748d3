use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::poll_run::{ClosePollRunParam, CreatePollRunParam, PollRun};

pub struct PollRunRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PollRunRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a newly posted poll as an open run.
    pub async fn create(&self, param: CreatePollRunParam) -> Result<PollRun, DbErr> {
        let created = entity::poll_run::ActiveModel {
            guild_id: ActiveValue::Set(param.guild_id),
            channel_id: ActiveValue::Set(param.channel_id),
            message_id: ActiveValue::Set(param.message_id),
            pair_key: ActiveValue::Set(param.pair_key),
            left_keys: ActiveValue::Set(serde_json::to_string(&param.left_keys).unwrap_or_default()),
            right_keys: ActiveValue::Set(
                serde_json::to_string(&param.right_keys).unwrap_or_default(),
            ),
            started_at: ActiveValue::Set(param.started_at),
            ends_at: ActiveValue::Set(param.ends_at),
            closed_at: ActiveValue::Set(None),
            votes_left: ActiveValue::Set(None),
            votes_right: ActiveValue::Set(None),
            result: ActiveValue::Set(None),
            affects_score: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(PollRun::from_entity(created))
    }

    /// Lists open runs whose end time has passed, oldest first.
    pub async fn list_due(&self, now: DateTime<Utc>, limit: u64) -> Result<Vec<PollRun>, DbErr> {
        let models = entity::prelude::PollRun::find()
            .filter(entity::poll_run::Column::ClosedAt.is_null())
            .filter(entity::poll_run::Column::EndsAt.lte(now))
            .order_by_asc(entity::poll_run::Column::EndsAt)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(PollRun::from_entity).collect())
    }

    /// Closes a tallied run. Closing is terminal; a closed run is never
    /// reopened or retried.
    pub async fn close(&self, param: ClosePollRunParam) -> Result<(), DbErr> {
        let model = entity::prelude::PollRun::find_by_id(param.id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("poll_run {}", param.id)))?;

        let mut active: entity::poll_run::ActiveModel = model.into();
        active.closed_at = ActiveValue::Set(Some(param.closed_at));
        active.votes_left = ActiveValue::Set(Some(param.votes_left));
        active.votes_right = ActiveValue::Set(Some(param.votes_right));
        active.result = ActiveValue::Set(Some(param.result.as_str().to_string()));
        active.affects_score = ActiveValue::Set(param.affects_score);
        active.update(self.db).await?;
        Ok(())
    }

    /// Closes a run in the error terminal state: no tallies, no rating
    /// effect. Used when any step of closing fails, so the run can never
    /// block future matchmaking by staying open.
    pub async fn mark_error(&self, id: i32, closed_at: DateTime<Utc>) -> Result<(), DbErr> {
        let model = entity::prelude::PollRun::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("poll_run {}", id)))?;

        let mut active: entity::poll_run::ActiveModel = model.into();
        active.closed_at = ActiveValue::Set(Some(closed_at));
        active.result = ActiveValue::Set(Some("error".to_string()));
        active.affects_score = ActiveValue::Set(false);
        active.update(self.db).await?;
        Ok(())
    }

    /// Pair keys of currently open runs in a guild. Open pairs are excluded
    /// from matchmaking independently of cooldowns.
    pub async fn open_pair_keys(&self, guild_id: &str) -> Result<HashSet<String>, DbErr> {
        let models = entity::prelude::PollRun::find()
            .filter(entity::poll_run::Column::GuildId.eq(guild_id))
            .filter(entity::poll_run::Column::ClosedAt.is_null())
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.pair_key).collect())
    }

    pub async fn count_open(&self, guild_id: &str) -> Result<u64, DbErr> {
        entity::prelude::PollRun::find()
            .filter(entity::poll_run::Column::GuildId.eq(guild_id))
            .filter(entity::poll_run::Column::ClosedAt.is_null())
            .count(self.db)
            .await
    }

    /// Lists closed runs newest first, optionally only those involving one
    /// asset. The key lists are stored as JSON arrays, so the asset filter
    /// matches the quoted key as a substring.
    pub async fn list_history(
        &self,
        asset_key: Option<&str>,
        limit: u64,
    ) -> Result<Vec<PollRun>, DbErr> {
        let mut query = entity::prelude::PollRun::find()
            .filter(entity::poll_run::Column::ClosedAt.is_not_null());

        if let Some(asset_key) = asset_key {
            let quoted = format!("\"{}\"", asset_key);
            query = query.filter(
                Condition::any()
                    .add(entity::poll_run::Column::LeftKeys.contains(&quoted))
                    .add(entity::poll_run::Column::RightKeys.contains(&quoted)),
            );
        }

        let models = query
            .order_by_desc(entity::poll_run::Column::ClosedAt)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(PollRun::from_entity).collect())
    }
}

#[cfg(test)]
mod test;
