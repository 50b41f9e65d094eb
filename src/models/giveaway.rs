use crate::entities::giveaway_entity as giveaways;
use crate::error::{AppError, AppResult};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use super::TelegramUser;

pub const DEFAULT_NUM_WINNERS: i32 = 3;
pub const DEFAULT_MIN_VOTES: i32 = 1;

/// 活动状态（由开始/结束时间与当前时间推导，不落库）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GiveawayStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl GiveawayStatus {
    /// now < start => Upcoming; start <= now <= end => Ongoing; now > end => Ended
    pub fn at(start_time: i64, end_time: i64, now: i64) -> Self {
        if now < start_time {
            GiveawayStatus::Upcoming
        } else if now <= end_time {
            GiveawayStatus::Ongoing
        } else {
            GiveawayStatus::Ended
        }
    }

    pub fn is_ongoing(self) -> bool {
        self == GiveawayStatus::Ongoing
    }

    /// 参与 / 投票仅在 Ongoing 时允许
    pub fn ensure_ongoing(self) -> AppResult<()> {
        if self.is_ongoing() {
            Ok(())
        } else {
            Err(AppError::GiveawayNotActive(self))
        }
    }
}

impl fmt::Display for GiveawayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveawayStatus::Upcoming => write!(f, "Upcoming"),
            GiveawayStatus::Ongoing => write!(f, "Ongoing"),
            GiveawayStatus::Ended => write!(f, "Ended"),
        }
    }
}

/// 活动关联的 Telegram 频道/群组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatRef {
    pub id: i64,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub photo: String,
    /// 系统频道：由配置追加，仅参与成员检查，使用系统 bot 查询
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ChatList(pub Vec<ChatRef>);

/// 参与 / 投票门槛
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
pub struct RequirementSet {
    #[serde(default = "default_true")]
    pub chat_member: bool,
    #[serde(default)]
    pub premium_user: bool,
    #[serde(default)]
    pub chat_booster: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RequirementSet {
    fn default() -> Self {
        Self {
            chat_member: true,
            premium_user: false,
            chat_booster: false,
        }
    }
}

impl RequirementSet {
    /// 成员检查始终开启
    pub fn normalized(self) -> Self {
        Self {
            chat_member: true,
            ..self
        }
    }
}

/// 名次(1..=num_winners) -> 奖励描述列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Rewards(pub BTreeMap<u32, Vec<String>>);

impl Rewards {
    /// 校验名次范围，去除空白奖励与空名次
    pub fn normalized(raw: BTreeMap<u32, Vec<String>>, num_winners: i32) -> AppResult<Self> {
        let mut cleaned = BTreeMap::new();
        for (rank, items) in raw {
            if rank < 1 || i64::from(rank) > i64::from(num_winners) {
                return Err(AppError::ValidationError(format!(
                    "Reward rank {rank} is outside 1..={num_winners}"
                )));
            }
            let items: Vec<String> = items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !items.is_empty() {
                cleaned.insert(rank, items);
            }
        }
        Ok(Rewards(cleaned))
    }

    pub fn for_rank(&self, rank: u32) -> &[String] {
        self.0.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 创建活动请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateGiveawayRequest {
    pub chats: Vec<ChatRef>,
    pub num_winners: Option<i32>,
    pub min_votes: Option<i32>,
    #[serde(default)]
    pub participation_requirements: Option<RequirementSet>,
    #[serde(default)]
    pub voting_requirements: Option<RequirementSet>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub rewards: BTreeMap<u32, Vec<String>>,
    /// epoch 秒
    pub start_time: i64,
    /// epoch 秒，必须大于 start_time
    pub end_time: i64,
    pub user: TelegramUser,
}

/// 活动详情响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GiveawayResponse {
    pub id: String,
    /// 活动配置的频道（助力检查范围）
    pub chats: Vec<ChatRef>,
    /// 成员检查范围（可能含系统频道）
    pub membership_chats: Vec<ChatRef>,
    pub num_winners: i32,
    pub min_votes: i32,
    pub participation_requirements: RequirementSet,
    pub voting_requirements: RequirementSet,
    #[schema(value_type = Object)]
    pub rewards: BTreeMap<u32, Vec<String>>,
    pub start_time: i64,
    pub end_time: i64,
    pub created_by: TelegramUser,
    pub created_on: i64,
    pub status: GiveawayStatus,
}

impl GiveawayResponse {
    pub fn from_model(m: giveaways::Model, now: i64, system_channel: Option<&ChatRef>) -> Self {
        let status = GiveawayStatus::at(m.start_time, m.end_time, now);
        let membership_chats = m.membership_chats(system_channel);
        GiveawayResponse {
            id: m.id,
            chats: m.chats.0,
            membership_chats,
            num_winners: m.num_winners,
            min_votes: m.min_votes,
            participation_requirements: m.participation_requirements,
            voting_requirements: m.voting_requirements,
            rewards: m.rewards.0,
            start_time: m.start_time,
            end_time: m.end_time,
            created_by: m.created_by,
            created_on: m.created_on,
            status,
        }
    }
}

/// 创建活动响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateGiveawayResponse {
    pub giveaway: GiveawayResponse,
    /// Mini App 参与链接
    pub participation_link: String,
    /// 是否已通过 bot 通知创建者（失败不影响创建结果）
    pub notified: bool,
}
