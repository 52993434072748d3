use super::*;

/// Tests that only open runs past their end time are due.
#[tokio::test]
async fn lists_only_open_past_runs() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PollRun)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let due = factory::create_poll_run(db, "42").await?;
    factory::poll_run::PollRunFactory::new(db, "42")
        .ends_at(now + Duration::minutes(30))
        .build()
        .await?;
    factory::poll_run::PollRunFactory::new(db, "42")
        .closed_at(Some(now - Duration::minutes(5)))
        .build()
        .await?;

    let repo = PollRunRepository::new(db);
    let listed = repo.list_due(now, 25).await?;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, due.id);

    Ok(())
}

/// Tests that the limit caps the result, oldest first.
#[tokio::test]
async fn respects_limit_and_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PollRun)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let oldest = factory::poll_run::PollRunFactory::new(db, "42")
        .ends_at(now - Duration::minutes(60))
        .build()
        .await?;
    factory::poll_run::PollRunFactory::new(db, "42")
        .ends_at(now - Duration::minutes(10))
        .build()
        .await?;

    let repo = PollRunRepository::new(db);
    let listed = repo.list_due(now, 1).await?;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, oldest.id);

    Ok(())
}
