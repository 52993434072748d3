pub use sea_orm_migration::prelude::*;

mod m20260712_000001_create_guild_settings_table;
mod m20260712_000002_create_poll_run_table;
mod m20260712_000003_create_pair_cooldown_table;
mod m20260712_000004_create_asset_score_table;
mod m20260712_000005_create_scheduler_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_000001_create_guild_settings_table::Migration),
            Box::new(m20260712_000002_create_poll_run_table::Migration),
            Box::new(m20260712_000003_create_pair_cooldown_table::Migration),
            Box::new(m20260712_000004_create_asset_score_table::Migration),
            Box::new(m20260712_000005_create_scheduler_log_table::Migration),
        ]
    }
}
