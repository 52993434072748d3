use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SchedulerLog::Table)
                    .if_not_exists()
                    .col(pk_auto(SchedulerLog::Id))
                    .col(string(SchedulerLog::GuildId))
                    .col(timestamp(SchedulerLog::RunAt))
                    .col(string(SchedulerLog::Status))
                    .col(string_null(SchedulerLog::Reason))
                    .col(string_null(SchedulerLog::PairKey))
                    .col(string_null(SchedulerLog::MessageId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduler_log_guild_run_at")
                    .table(SchedulerLog::Table)
                    .col(SchedulerLog::GuildId)
                    .col(SchedulerLog::RunAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SchedulerLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SchedulerLog {
    Table,
    Id,
    GuildId,
    RunAt,
    Status,
    Reason,
    PairKey,
    MessageId,
}
