use sea_orm_migration::prelude::*;

/// Voters (投票记录, 软失效而非删除)
#[derive(DeriveIden)]
enum Voters {
    Table,
    Id,
    GiveawayId,
    ParticipantId,
    VoterUserId,
    FirstName,
    LastName,
    Username,
    IsPremium,
    PhotoUrl,
    VotedOn,
    State,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Voters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Voters::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Voters::GiveawayId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Voters::ParticipantId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Voters::VoterUserId).big_integer().not_null())
                    .col(ColumnDef::new(Voters::FirstName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Voters::LastName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Voters::Username)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Voters::IsPremium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Voters::PhotoUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Voters::VotedOn).big_integer().not_null())
                    // active / invalidated
                    .col(
                        ColumnDef::new(Voters::State)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一 (活动, 参与者, 投票人) 只允许一行；失效后重新投票是原地恢复
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_voters_giveaway_participant_voter_unique")
                    .table(Voters::Table)
                    .col(Voters::GiveawayId)
                    .col(Voters::ParticipantId)
                    .col(Voters::VoterUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 排行榜聚合
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_voters_giveaway_state")
                    .table(Voters::Table)
                    .col(Voters::GiveawayId)
                    .col(Voters::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Voters::Table).to_owned())
            .await
    }
}
