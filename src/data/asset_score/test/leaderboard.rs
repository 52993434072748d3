use super::*;

/// Tests descending Elo order with a limit.
#[tokio::test]
async fn orders_by_elo_descending() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AssetScore)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::asset_score::AssetScoreFactory::new(db, "Abra|M")
        .elo(1520.0)
        .build()
        .await?;
    factory::asset_score::AssetScoreFactory::new(db, "Eevee|F")
        .elo(1580.0)
        .build()
        .await?;
    factory::asset_score::AssetScoreFactory::new(db, "Mudkip|M")
        .elo(1495.0)
        .build()
        .await?;

    let repo = AssetScoreRepository::new(db);
    let top = repo.leaderboard(2).await?;

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].asset_key, "Eevee|F");
    assert_eq!(top[1].asset_key, "Abra|M");

    Ok(())
}
