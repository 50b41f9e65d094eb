use sea_orm_migration::prelude::*;

/// Giveaways (投票抽奖活动)
#[derive(DeriveIden)]
enum Giveaways {
    Table,
    Id,
    Chats,
    NumWinners,
    MinVotes,
    ParticipationRequirements,
    VotingRequirements,
    Rewards,
    StartTime,
    EndTime,
    CreatedBy,
    CreatedOn,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 时间字段统一使用 epoch 秒 (BIGINT)，与 Mini App 前端保持一致
/// chats / requirements / rewards / created_by 为 JSON 快照，创建后不再修改
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Giveaways::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Giveaways::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Giveaways::Chats).json().not_null())
                    .col(
                        ColumnDef::new(Giveaways::NumWinners)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(Giveaways::MinVotes)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Giveaways::ParticipationRequirements)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Giveaways::VotingRequirements)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Giveaways::Rewards).json().not_null())
                    .col(
                        ColumnDef::new(Giveaways::StartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Giveaways::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Giveaways::CreatedBy).json().not_null())
                    .col(
                        ColumnDef::new(Giveaways::CreatedOn)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Giveaways::Table).to_owned())
            .await
    }
}
