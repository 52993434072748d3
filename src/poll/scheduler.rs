//! Per-minute scheduler driving the poll lifecycle.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::poll::engine::MarketPollEngine;

/// Starts the market poll scheduler.
///
/// Runs every minute and lets the engine close due runs and post
/// cadence-driven polls. The engine's own reentrancy guard drops a tick that
/// would overlap a still-running one.
///
/// # Arguments
/// - `engine`: Shared poll engine
pub async fn start_scheduler(engine: Arc<MarketPollEngine>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_engine = engine.clone();

    // Schedule job to run every minute
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let engine = job_engine.clone();

        Box::pin(async move {
            engine.tick().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Market poll scheduler started");

    Ok(())
}
