use crate::models::{ChatList, ChatRef, RequirementSet, Rewards, TelegramUser};
use sea_orm::entity::prelude::*;

/// 投票抽奖活动实体
/// 说明:
/// - 创建后不可修改
/// - chats / requirements / rewards / created_by 为 JSON 快照
/// - start_time / end_time / created_on 为 epoch 秒
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "giveaways")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Json")]
    pub chats: ChatList,
    pub num_winners: i32,
    /// 成为有效获奖者所需的最少票数
    pub min_votes: i32,
    #[sea_orm(column_type = "Json")]
    pub participation_requirements: RequirementSet,
    #[sea_orm(column_type = "Json")]
    pub voting_requirements: RequirementSet,
    #[sea_orm(column_type = "Json")]
    pub rewards: Rewards,
    pub start_time: i64,
    pub end_time: i64,
    #[sea_orm(column_type = "Json")]
    pub created_by: TelegramUser,
    pub created_on: i64,
}

impl Model {
    /// 成员检查范围：活动频道 + 系统频道（若开启且未包含）
    pub fn membership_chats(&self, system_channel: Option<&ChatRef>) -> Vec<ChatRef> {
        let mut chats = self.chats.0.clone();
        if let Some(system) = system_channel
            && !chats.iter().any(|c| c.id == system.id)
        {
            chats.push(system.clone());
        }
        chats
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
