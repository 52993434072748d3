//! Pair cooldown factory.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test cooldown rows. Defaults to a cooldown that is
/// still active for five more days.
pub struct PairCooldownFactory<'a> {
    db: &'a DatabaseConnection,
    pair_key: String,
    last_polled_at: chrono::DateTime<Utc>,
    next_eligible_at: chrono::DateTime<Utc>,
    polls_count: i32,
}

impl<'a> PairCooldownFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, pair_key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            db,
            pair_key: pair_key.into(),
            last_polled_at: now,
            next_eligible_at: now + Duration::days(5),
            polls_count: 1,
        }
    }

    pub fn next_eligible_at(mut self, next_eligible_at: chrono::DateTime<Utc>) -> Self {
        self.next_eligible_at = next_eligible_at;
        self
    }

    pub async fn build(self) -> Result<entity::pair_cooldown::Model, DbErr> {
        entity::pair_cooldown::ActiveModel {
            id: ActiveValue::NotSet,
            pair_key: ActiveValue::Set(self.pair_key),
            last_polled_at: ActiveValue::Set(self.last_polled_at),
            next_eligible_at: ActiveValue::Set(self.next_eligible_at),
            polls_count: ActiveValue::Set(self.polls_count),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active cooldown for the pairing.
pub async fn create_cooldown(
    db: &DatabaseConnection,
    pair_key: impl Into<String>,
) -> Result<entity::pair_cooldown::Model, DbErr> {
    PairCooldownFactory::new(db, pair_key).build().await
}
