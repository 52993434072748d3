use super::*;

/// Tests that a created run is open and round-trips its key lists.
#[tokio::test]
async fn creates_open_run() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PollRun)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = PollRunRepository::new(db);
    let run = repo
        .create(CreatePollRunParam {
            guild_id: "42".to_string(),
            channel_id: "900".to_string(),
            message_id: "500".to_string(),
            pair_key: "Abra|M||Eevee|F".to_string(),
            left_keys: vec!["Eevee|F".to_string()],
            right_keys: vec!["Abra|M".to_string()],
            started_at: now,
            ends_at: now + Duration::minutes(120),
        })
        .await?;

    assert!(run.is_open());
    assert_eq!(run.left_keys, vec!["Eevee|F".to_string()]);
    assert_eq!(run.right_keys, vec!["Abra|M".to_string()]);
    assert!(run.result.is_none());
    assert!(!run.affects_score);

    Ok(())
}
