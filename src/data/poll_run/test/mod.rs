pub use chrono::{Duration, Utc};
pub use sea_orm::DbErr;
pub use test_utils::builder::TestBuilder;
pub use test_utils::factory;

pub use crate::data::poll_run::PollRunRepository;
pub use crate::market::elo::PollResult;
pub use crate::model::poll_run::{ClosePollRunParam, CreatePollRunParam};

mod create;
mod list_due;
mod list_history;
