//! Per-asset rating record.

use chrono::{DateTime, Utc};

use crate::market::elo::BASE_ELO;

/// Elo rating and vote history for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetScore {
    pub asset_key: String,
    pub elo: f64,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub polls_count: i32,
    pub votes_for: i32,
    pub votes_against: i32,
    pub last_poll_at: Option<DateTime<Utc>>,
}

impl AssetScore {
    pub fn from_entity(entity: entity::asset_score::Model) -> Self {
        Self {
            asset_key: entity.asset_key,
            elo: entity.elo,
            wins: entity.wins,
            losses: entity.losses,
            ties: entity.ties,
            polls_count: entity.polls_count,
            votes_for: entity.votes_for,
            votes_against: entity.votes_against,
            last_poll_at: entity.last_poll_at,
        }
    }

    /// Fresh record for an asset that has never been polled.
    pub fn default_for(asset_key: &str) -> Self {
        Self {
            asset_key: asset_key.to_string(),
            elo: BASE_ELO,
            wins: 0,
            losses: 0,
            ties: 0,
            polls_count: 0,
            votes_for: 0,
            votes_against: 0,
            last_poll_at: None,
        }
    }
}
