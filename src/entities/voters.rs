use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 投票状态：失效（风控等外部流程标记）后可由同一投票人原地恢复
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "invalidated")]
    Invalidated,
}

impl VoteState {
    pub fn is_active(self) -> bool {
        self == VoteState::Active
    }
}

impl std::fmt::Display for VoteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteState::Active => write!(f, "active"),
            VoteState::Invalidated => write!(f, "invalidated"),
        }
    }
}

/// 投票记录实体
/// 说明:
/// - (giveaway_id, participant_id, voter_user_id) 唯一，同一三元组只有一行
/// - 不做物理删除，失效通过 state 标记
/// - voted_on 为首次投票时间，恢复时不刷新
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "voters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub giveaway_id: String,
    pub participant_id: String,
    /// 投票人 Telegram 用户ID
    pub voter_user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_premium: bool,
    pub photo_url: String,
    pub voted_on: i64,
    pub state: VoteState,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
