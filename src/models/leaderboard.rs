use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{display_name, non_empty};
use crate::entities::participant_entity as participants;

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantRank {
    /// 参与者ID
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub photo_url: Option<String>,
    pub vote_count: u64,
    pub participated_on: i64,
    /// 1 起始；零票参与者不在榜上，为 None
    pub rank: Option<u32>,
}

impl ParticipantRank {
    pub fn from_participant(p: &participants::Model, vote_count: u64, rank: Option<u32>) -> Self {
        ParticipantRank {
            id: p.id.clone(),
            user_id: p.user_id,
            name: display_name(&p.first_name, &p.last_name),
            photo_url: non_empty(p.photo_url.clone()),
            vote_count,
            participated_on: p.participated_on,
            rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// 仅包含至少一票的参与者，已排序
    pub leaderboard: Vec<ParticipantRank>,
    /// 查看者本人（若为参与者）
    pub viewer: Option<ParticipantRank>,
    pub eligible_winners_count: u64,
}

/// 单个参与者的名次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RankResponse {
    pub rank: Option<u32>,
    pub vote_count: u64,
    /// 查看者当前是否对该参与者有有效投票
    pub has_voter_voted: bool,
}
