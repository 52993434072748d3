pub mod asset_score;
pub mod guild_settings;
pub mod pair_cooldown;
pub mod poll_run;
pub mod scheduler_log;

pub mod prelude {
    pub use super::asset_score::Entity as AssetScore;
    pub use super::guild_settings::Entity as GuildSettings;
    pub use super::pair_cooldown::Entity as PairCooldown;
    pub use super::poll_run::Entity as PollRun;
    pub use super::scheduler_log::Entity as SchedulerLog;
}
