pub use chrono::{Duration, Utc};
pub use sea_orm::DbErr;
pub use test_utils::builder::TestBuilder;

pub use crate::data::scheduler_log::SchedulerLogRepository;
pub use crate::model::scheduler_log::{CreateSchedulerLogParam, SchedulerStatus};

mod last_run_at;
