use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PairCooldown::Table)
                    .if_not_exists()
                    .col(pk_auto(PairCooldown::Id))
                    .col(string_uniq(PairCooldown::PairKey))
                    .col(timestamp(PairCooldown::LastPolledAt))
                    .col(timestamp(PairCooldown::NextEligibleAt))
                    .col(integer(PairCooldown::PollsCount))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PairCooldown::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PairCooldown {
    Table,
    Id,
    PairKey,
    LastPolledAt,
    NextEligibleAt,
    PollsCount,
}
