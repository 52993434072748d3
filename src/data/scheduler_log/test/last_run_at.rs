use super::*;

fn entry(
    guild_id: &str,
    run_at: chrono::DateTime<Utc>,
    status: SchedulerStatus,
) -> CreateSchedulerLogParam {
    CreateSchedulerLogParam {
        guild_id: guild_id.to_string(),
        run_at,
        status,
        reason: None,
        pair_key: None,
        message_id: None,
    }
}

/// Tests that the newest entry for the guild wins, regardless of status.
#[tokio::test]
async fn returns_latest_entry_for_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::SchedulerLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    // Whole seconds so the value round-trips through SQLite exactly.
    use chrono::Timelike;
    let now = Utc::now().with_nanosecond(0).unwrap();
    let repo = SchedulerLogRepository::new(db);
    repo.create(entry("42", now - Duration::hours(12), SchedulerStatus::Posted))
        .await?;
    repo.create(entry("42", now - Duration::hours(1), SchedulerStatus::Skipped))
        .await?;
    repo.create(entry("99", now, SchedulerStatus::Posted)).await?;

    let last = repo.last_run_at("42").await?.unwrap();
    assert_eq!(last, now - Duration::hours(1));

    Ok(())
}

/// Tests that a guild with no attempts yields None.
#[tokio::test]
async fn none_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::SchedulerLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SchedulerLogRepository::new(db);
    assert!(repo.last_run_at("42").await?.is_none());

    Ok(())
}
