pub use chrono::{Duration, Utc};
pub use sea_orm::DbErr;
pub use test_utils::builder::TestBuilder;
pub use test_utils::factory;

pub use crate::data::pair_cooldown::PairCooldownRepository;
pub use crate::model::pair_cooldown::UpsertCooldownParam;
