//! Pair cooldown domain model.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PairCooldown {
    pub pair_key: String,
    pub last_polled_at: DateTime<Utc>,
    pub next_eligible_at: DateTime<Utc>,
    pub polls_count: i32,
}

impl PairCooldown {
    pub fn from_entity(entity: entity::pair_cooldown::Model) -> Self {
        Self {
            pair_key: entity.pair_key,
            last_polled_at: entity.last_polled_at,
            next_eligible_at: entity.next_eligible_at,
            polls_count: entity.polls_count,
        }
    }
}

/// Parameters for recording a completed poll against a pairing.
#[derive(Debug, Clone)]
pub struct UpsertCooldownParam {
    pub pair_key: String,
    pub last_polled_at: DateTime<Utc>,
    pub next_eligible_at: DateTime<Utc>,
}
