//! Scheduler outcome log records.

use chrono::{DateTime, Utc};

/// Outcome class of one posting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Posted,
    Skipped,
    Error,
}

impl SchedulerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerStatus::Posted => "posted",
            SchedulerStatus::Skipped => "skipped",
            SchedulerStatus::Error => "error",
        }
    }
}

/// Parameters for recording one scheduler posting attempt.
#[derive(Debug, Clone)]
pub struct CreateSchedulerLogParam {
    pub guild_id: String,
    pub run_at: DateTime<Utc>,
    pub status: SchedulerStatus,
    pub reason: Option<String>,
    pub pair_key: Option<String>,
    pub message_id: Option<String>,
}
