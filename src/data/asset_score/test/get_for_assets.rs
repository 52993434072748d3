use super::*;

/// Tests that only requested keys come back, and unseen assets are simply
/// absent rather than erroring.
#[tokio::test]
async fn returns_requested_known_assets() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AssetScore)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_score(db, "Abra|M").await?;
    factory::create_score(db, "Eevee|F").await?;
    factory::create_score(db, "Mudkip|M").await?;

    let repo = AssetScoreRepository::new(db);
    let scores = repo
        .get_for_assets(&["Abra|M".to_string(), "Pichu|F".to_string()])
        .await?;

    assert_eq!(scores.len(), 1);
    assert!(scores.contains_key("Abra|M"));
    assert!(!scores.contains_key("Pichu|F"));

    Ok(())
}

/// Tests that an empty key list short-circuits to an empty map.
#[tokio::test]
async fn empty_request_is_empty() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AssetScore)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AssetScoreRepository::new(db);
    assert!(repo.get_for_assets(&[]).await?.is_empty());

    Ok(())
}
