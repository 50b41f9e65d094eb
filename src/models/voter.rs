use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TelegramUser, display_name, non_empty};
use crate::entities::voter_entity as voters;

/// 投票请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct VoteRequest {
    pub user: TelegramUser,
}

/// 投票写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// 新插入
    Created,
    /// 恢复此前失效的投票
    Reactivated,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoterResponse {
    pub id: String,
    pub giveaway_id: String,
    pub participant_id: String,
    pub user: TelegramUser,
    pub voted_on: i64,
    pub is_invalid: bool,
}

impl From<voters::Model> for VoterResponse {
    fn from(m: voters::Model) -> Self {
        VoterResponse {
            user: TelegramUser {
                id: m.voter_user_id,
                first_name: m.first_name,
                last_name: m.last_name,
                username: m.username,
                is_premium: m.is_premium,
                photo_url: m.photo_url,
            },
            is_invalid: !m.state.is_active(),
            id: m.id,
            giveaway_id: m.giveaway_id,
            participant_id: m.participant_id,
            voted_on: m.voted_on,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoteResponse {
    pub voter: VoterResponse,
    pub outcome: VoteOutcome,
}

/// 投票人列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VoterListItem {
    pub id: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub username: Option<String>,
    pub is_premium: bool,
    pub voted_on: i64,
    /// 是否为当前查看者本人
    pub is_viewer: bool,
}

impl VoterListItem {
    pub fn from_model(m: voters::Model, viewer_id: i64) -> Self {
        VoterListItem {
            name: display_name(&m.first_name, &m.last_name),
            is_viewer: m.voter_user_id == viewer_id,
            photo_url: non_empty(m.photo_url),
            username: non_empty(m.username),
            is_premium: m.is_premium,
            voted_on: m.voted_on,
            id: m.id,
        }
    }
}
