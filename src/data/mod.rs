//! Database repository layer.
//!
//! Repository structs handle all reads and writes for the market poll tables.
//! They use SeaORM entity models internally and return domain models from
//! `crate::model`, keeping SeaORM types out of the business logic layer.

pub mod asset_score;
pub mod guild_settings;
pub mod pair_cooldown;
pub mod poll_run;
pub mod scheduler_log;
