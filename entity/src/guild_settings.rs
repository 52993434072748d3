//! Per-guild market poll configuration.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Discord guild ID (u64, stored as string).
    #[sea_orm(unique)]
    pub guild_id: String,
    /// Whether automatic poll posting is enabled for this guild.
    pub enabled: bool,
    /// Target channel ID for polls, unset until configured.
    pub channel_id: Option<String>,
    /// Minutes between automatic poll posts.
    pub cadence_minutes: i32,
    /// Minutes a poll stays open before it is closed and tallied.
    pub poll_minutes: i32,
    /// Days before the same pairing may be offered again.
    pub pair_cooldown_days: i32,
    /// Minimum total votes for a closed poll to affect ratings.
    pub min_votes: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
