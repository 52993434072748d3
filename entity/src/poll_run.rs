//! One posted, time-boxed market poll.
//!
//! A run is open while `closed_at` is null. Closing fills in the tallies,
//! `result` (`left`, `right`, `tie`, or `error`) and `affects_score`; a closed
//! run is terminal and never reopened.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "poll_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Discord guild ID (u64, stored as string).
    pub guild_id: String,
    /// Channel the poll message was posted in.
    pub channel_id: String,
    /// Discord message ID of the poll.
    #[sea_orm(unique)]
    pub message_id: String,
    /// Canonical order-independent key for the matched pairing.
    pub pair_key: String,
    /// JSON array of asset keys on the left side.
    pub left_keys: String,
    /// JSON array of asset keys on the right side.
    pub right_keys: String,
    pub started_at: DateTimeUtc,
    /// When the run becomes due for closing.
    pub ends_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
    pub votes_left: Option<i32>,
    pub votes_right: Option<i32>,
    pub result: Option<String>,
    pub affects_score: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
