//! Elo-style preference rating for a single asset.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "asset_score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Asset key in `Name|Gender` form.
    #[sea_orm(unique)]
    pub asset_key: String,
    /// Elo rating, starts at 1500.
    pub elo: f64,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    /// Rated polls this asset has appeared in.
    pub polls_count: i32,
    /// Cumulative votes for the side containing this asset.
    pub votes_for: i32,
    /// Cumulative votes for the opposing side.
    pub votes_against: i32,
    pub last_poll_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
