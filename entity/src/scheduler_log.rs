//! Outcome record for one scheduler posting attempt.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduler_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Discord guild ID (u64, stored as string).
    pub guild_id: String,
    pub run_at: DateTimeUtc,
    /// `posted`, `skipped` or `error`.
    pub status: String,
    /// Short machine-readable reason for skipped/error outcomes.
    pub reason: Option<String>,
    pub pair_key: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
