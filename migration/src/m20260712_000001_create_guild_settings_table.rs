use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(GuildSettings::Id))
                    .col(string_uniq(GuildSettings::GuildId))
                    .col(boolean(GuildSettings::Enabled))
                    .col(string_null(GuildSettings::ChannelId))
                    .col(integer(GuildSettings::CadenceMinutes))
                    .col(integer(GuildSettings::PollMinutes))
                    .col(integer(GuildSettings::PairCooldownDays))
                    .col(integer(GuildSettings::MinVotes))
                    .col(
                        timestamp(GuildSettings::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp(GuildSettings::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuildSettings {
    Table,
    Id,
    GuildId,
    Enabled,
    ChannelId,
    CadenceMinutes,
    PollMinutes,
    PairCooldownDays,
    MinVotes,
    CreatedAt,
    UpdatedAt,
}
