//! Asset score factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test score rows. Defaults to a fresh 1500 rating
/// with no history.
pub struct AssetScoreFactory<'a> {
    db: &'a DatabaseConnection,
    asset_key: String,
    elo: f64,
    wins: i32,
    losses: i32,
    ties: i32,
    polls_count: i32,
    votes_for: i32,
    votes_against: i32,
    last_poll_at: Option<chrono::DateTime<Utc>>,
}

impl<'a> AssetScoreFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, asset_key: impl Into<String>) -> Self {
        Self {
            db,
            asset_key: asset_key.into(),
            elo: 1500.0,
            wins: 0,
            losses: 0,
            ties: 0,
            polls_count: 0,
            votes_for: 0,
            votes_against: 0,
            last_poll_at: None,
        }
    }

    pub fn elo(mut self, elo: f64) -> Self {
        self.elo = elo;
        self
    }

    pub fn wins(mut self, wins: i32) -> Self {
        self.wins = wins;
        self
    }

    pub fn losses(mut self, losses: i32) -> Self {
        self.losses = losses;
        self
    }

    pub fn polls_count(mut self, polls_count: i32) -> Self {
        self.polls_count = polls_count;
        self
    }

    pub async fn build(self) -> Result<entity::asset_score::Model, DbErr> {
        entity::asset_score::ActiveModel {
            id: ActiveValue::NotSet,
            asset_key: ActiveValue::Set(self.asset_key),
            elo: ActiveValue::Set(self.elo),
            wins: ActiveValue::Set(self.wins),
            losses: ActiveValue::Set(self.losses),
            ties: ActiveValue::Set(self.ties),
            polls_count: ActiveValue::Set(self.polls_count),
            votes_for: ActiveValue::Set(self.votes_for),
            votes_against: ActiveValue::Set(self.votes_against),
            last_poll_at: ActiveValue::Set(self.last_poll_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a fresh 1500-rated score row for the asset.
pub async fn create_score(
    db: &DatabaseConnection,
    asset_key: impl Into<String>,
) -> Result<entity::asset_score::Model, DbErr> {
    AssetScoreFactory::new(db, asset_key).build().await
}
