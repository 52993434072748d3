pub use chrono::Utc;
pub use sea_orm::DbErr;
pub use test_utils::builder::TestBuilder;
pub use test_utils::factory;

pub use crate::data::asset_score::AssetScoreRepository;
pub use crate::model::asset_score::AssetScore;

mod get_for_assets;
mod leaderboard;
