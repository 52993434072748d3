use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, QueryFilter,
};

use crate::model::pair_cooldown::{PairCooldown, UpsertCooldownParam};

pub struct PairCooldownRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PairCooldownRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Map of pair key to its next-eligible time, restricted to entries that
    /// are still in the future. Expired cooldowns simply drop out of the map.
    pub async fn cooldown_map(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<String, DateTime<Utc>>, DbErr> {
        let models = entity::prelude::PairCooldown::find()
            .filter(entity::pair_cooldown::Column::NextEligibleAt.gt(now))
            .all(self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (m.pair_key, m.next_eligible_at))
            .collect())
    }

    /// Records a completed poll against a pairing: refreshes the timestamps
    /// and increments the poll counter on conflict.
    pub async fn upsert(&self, param: UpsertCooldownParam) -> Result<PairCooldown, DbErr> {
        let model = entity::prelude::PairCooldown::insert(entity::pair_cooldown::ActiveModel {
            pair_key: ActiveValue::Set(param.pair_key),
            last_polled_at: ActiveValue::Set(param.last_polled_at),
            next_eligible_at: ActiveValue::Set(param.next_eligible_at),
            polls_count: ActiveValue::Set(1),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(entity::pair_cooldown::Column::PairKey)
                .value(
                    entity::pair_cooldown::Column::LastPolledAt,
                    param.last_polled_at,
                )
                .value(
                    entity::pair_cooldown::Column::NextEligibleAt,
                    param.next_eligible_at,
                )
                .value(
                    entity::pair_cooldown::Column::PollsCount,
                    Expr::col(entity::pair_cooldown::Column::PollsCount).add(1),
                )
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(PairCooldown::from_entity(model))
    }
}

#[cfg(test)]
mod test;
