use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssetScore::Table)
                    .if_not_exists()
                    .col(pk_auto(AssetScore::Id))
                    .col(string_uniq(AssetScore::AssetKey))
                    .col(double(AssetScore::Elo))
                    .col(integer(AssetScore::Wins))
                    .col(integer(AssetScore::Losses))
                    .col(integer(AssetScore::Ties))
                    .col(integer(AssetScore::PollsCount))
                    .col(integer(AssetScore::VotesFor))
                    .col(integer(AssetScore::VotesAgainst))
                    .col(timestamp_null(AssetScore::LastPollAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssetScore::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AssetScore {
    Table,
    Id,
    AssetKey,
    Elo,
    Wins,
    Losses,
    Ties,
    PollsCount,
    VotesFor,
    VotesAgainst,
    LastPollAt,
}
