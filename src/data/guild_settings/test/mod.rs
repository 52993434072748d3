pub use crate::data::guild_settings::GuildSettingsRepository;
pub use crate::model::guild_settings::{UpdateGuildSettingsParam, DEFAULT_CADENCE_MINUTES};
pub use sea_orm::DbErr;
pub use test_utils::builder::TestBuilder;
pub use test_utils::factory;
