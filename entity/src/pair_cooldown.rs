//! Re-offer cooldown for a matched pairing.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pair_cooldown")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Canonical order-independent key for the pairing.
    #[sea_orm(unique)]
    pub pair_key: String,
    pub last_polled_at: DateTimeUtc,
    /// Earliest time the pairing may be matched again.
    pub next_eligible_at: DateTimeUtc,
    /// How many polls have run for this pairing.
    pub polls_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
