use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PollRun::Table)
                    .if_not_exists()
                    .col(pk_auto(PollRun::Id))
                    .col(string(PollRun::GuildId))
                    .col(string(PollRun::ChannelId))
                    .col(string_uniq(PollRun::MessageId))
                    .col(string(PollRun::PairKey))
                    .col(text(PollRun::LeftKeys))
                    .col(text(PollRun::RightKeys))
                    .col(timestamp(PollRun::StartedAt))
                    .col(timestamp(PollRun::EndsAt))
                    .col(timestamp_null(PollRun::ClosedAt))
                    .col(integer_null(PollRun::VotesLeft))
                    .col(integer_null(PollRun::VotesRight))
                    .col(string_null(PollRun::Result))
                    .col(boolean(PollRun::AffectsScore))
                    .col(
                        timestamp(PollRun::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_poll_run_open_due")
                    .table(PollRun::Table)
                    .col(PollRun::ClosedAt)
                    .col(PollRun::EndsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PollRun::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PollRun {
    Table,
    Id,
    GuildId,
    ChannelId,
    MessageId,
    PairKey,
    LeftKeys,
    RightKeys,
    StartedAt,
    EndsAt,
    ClosedAt,
    VotesLeft,
    VotesRight,
    Result,
    AffectsScore,
    CreatedAt,
}
