use super::*;

/// Tests that the asset filter matches either side of a run.
#[tokio::test]
async fn filters_by_asset_key() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PollRun)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    factory::poll_run::PollRunFactory::new(db, "42")
        .sides(vec!["Abra|M".to_string()], vec!["Eevee|F".to_string()])
        .closed_at(Some(now))
        .build()
        .await?;
    factory::poll_run::PollRunFactory::new(db, "42")
        .sides(
            vec!["Mudkip|M".to_string()],
            vec!["Abra|M".to_string(), "Torchic|F".to_string()],
        )
        .closed_at(Some(now))
        .build()
        .await?;
    factory::poll_run::PollRunFactory::new(db, "42")
        .sides(vec!["Pichu|F".to_string()], vec!["Mudkip|M".to_string()])
        .closed_at(Some(now))
        .build()
        .await?;

    let repo = PollRunRepository::new(db);
    let abra = repo.list_history(Some("Abra|M"), 10).await?;
    assert_eq!(abra.len(), 2);

    let all = repo.list_history(None, 10).await?;
    assert_eq!(all.len(), 3);

    Ok(())
}

/// Tests that open runs never appear in history.
#[tokio::test]
async fn excludes_open_runs() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PollRun)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_poll_run(db, "42").await?;

    let repo = PollRunRepository::new(db);
    assert!(repo.list_history(None, 10).await?.is_empty());

    Ok(())
}
