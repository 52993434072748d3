//! Poll run domain model and operation parameters.

use chrono::{DateTime, Utc};

use crate::market::elo::PollResult;

/// One posted, time-boxed poll. Open while `closed_at` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRun {
    pub id: i32,
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub pair_key: String,
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub votes_left: Option<i32>,
    pub votes_right: Option<i32>,
    pub result: Option<PollResult>,
    pub affects_score: bool,
}

impl PollRun {
    /// Converts an entity model at the repository boundary. The key lists are
    /// stored as JSON arrays written by this application; anything unreadable
    /// collapses to an empty list rather than failing the read.
    pub fn from_entity(entity: entity::poll_run::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id,
            channel_id: entity.channel_id,
            message_id: entity.message_id,
            pair_key: entity.pair_key,
            left_keys: serde_json::from_str(&entity.left_keys).unwrap_or_default(),
            right_keys: serde_json::from_str(&entity.right_keys).unwrap_or_default(),
            started_at: entity.started_at,
            ends_at: entity.ends_at,
            closed_at: entity.closed_at,
            votes_left: entity.votes_left,
            votes_right: entity.votes_right,
            result: entity.result.as_deref().and_then(PollResult::parse),
            affects_score: entity.affects_score,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Parameters for recording a newly posted poll.
#[derive(Debug, Clone)]
pub struct CreatePollRunParam {
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub pair_key: String,
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Parameters for closing a tallied poll.
#[derive(Debug, Clone)]
pub struct ClosePollRunParam {
    pub id: i32,
    pub closed_at: DateTime<Utc>,
    pub votes_left: i32,
    pub votes_right: i32,
    pub result: PollResult,
    pub affects_score: bool,
}
