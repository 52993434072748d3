use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::model::asset_score::AssetScore;

pub struct AssetScoreRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssetScoreRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches score records for the given asset keys. Assets that have never
    /// been polled are absent from the result; callers default them to a
    /// fresh record at the base rating.
    pub async fn get_for_assets(
        &self,
        asset_keys: &[String],
    ) -> Result<HashMap<String, AssetScore>, DbErr> {
        if asset_keys.is_empty() {
            return Ok(HashMap::new());
        }

        let models = entity::prelude::AssetScore::find()
            .filter(entity::asset_score::Column::AssetKey.is_in(asset_keys.iter().cloned()))
            .all(self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (m.asset_key.clone(), AssetScore::from_entity(m)))
            .collect())
    }

    /// Writes updated score records, inserting or replacing per asset key.
    pub async fn upsert_many(&self, updates: &[AssetScore]) -> Result<(), DbErr> {
        for update in updates {
            entity::prelude::AssetScore::insert(entity::asset_score::ActiveModel {
                asset_key: ActiveValue::Set(update.asset_key.clone()),
                elo: ActiveValue::Set(update.elo),
                wins: ActiveValue::Set(update.wins),
                losses: ActiveValue::Set(update.losses),
                ties: ActiveValue::Set(update.ties),
                polls_count: ActiveValue::Set(update.polls_count),
                votes_for: ActiveValue::Set(update.votes_for),
                votes_against: ActiveValue::Set(update.votes_against),
                last_poll_at: ActiveValue::Set(update.last_poll_at),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::column(entity::asset_score::Column::AssetKey)
                    .update_columns([
                        entity::asset_score::Column::Elo,
                        entity::asset_score::Column::Wins,
                        entity::asset_score::Column::Losses,
                        entity::asset_score::Column::Ties,
                        entity::asset_score::Column::PollsCount,
                        entity::asset_score::Column::VotesFor,
                        entity::asset_score::Column::VotesAgainst,
                        entity::asset_score::Column::LastPollAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await?;
        }
        Ok(())
    }

    /// Highest-rated assets first.
    pub async fn leaderboard(&self, limit: u64) -> Result<Vec<AssetScore>, DbErr> {
        let models = entity::prelude::AssetScore::find()
            .order_by_desc(entity::asset_score::Column::Elo)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(AssetScore::from_entity).collect())
    }
}

#[cfg(test)]
mod test;
