use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::{ChatRef, TelegramUser};

/// 未满足的门槛类型（前端据此引导用户去关注 / 升级 / 助力）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    ChatMember,
    PremiumUser,
    ChatBooster,
}

impl RequirementKind {
    pub fn user_message(self) -> &'static str {
        match self {
            RequirementKind::ChatMember => "Subscribe to all mentioned chats above.",
            RequirementKind::PremiumUser => "Only Telegram premium users are allowed.",
            RequirementKind::ChatBooster => "Boost all mentioned chats above.",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementKind::ChatMember => write!(f, "chat_member"),
            RequirementKind::PremiumUser => write!(f, "premium_user"),
            RequirementKind::ChatBooster => write!(f, "chat_booster"),
        }
    }
}

/// 门槛作用范围：参与 or 投票
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequirementScope {
    Participation,
    Voting,
}

/// 单个频道的检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Satisfied,
    NotSatisfied,
    /// 外部接口失败或超时，按未满足处理，用户可手动重新检查
    Unavailable,
}

impl CheckStatus {
    pub fn is_satisfied(self) -> bool {
        self == CheckStatus::Satisfied
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChatCheck {
    pub chat_id: i64,
    pub title: String,
    pub link: String,
    pub status: CheckStatus,
}

impl ChatCheck {
    pub fn new(chat: &ChatRef, status: CheckStatus) -> Self {
        Self {
            chat_id: chat.id,
            title: chat.title.clone(),
            link: chat.link.clone(),
            status,
        }
    }
}

/// 门槛检查报告；未开启的门槛为 None
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequirementReport {
    pub chat_member: Option<Vec<ChatCheck>>,
    pub premium_user: Option<bool>,
    pub chat_booster: Option<Vec<ChatCheck>>,
}

impl RequirementReport {
    /// 第一个未满足的门槛（成员 -> 会员 -> 助力）
    pub fn first_failure(&self) -> Option<RequirementKind> {
        let all_ok = |checks: &Option<Vec<ChatCheck>>| {
            checks
                .as_ref()
                .is_none_or(|c| c.iter().all(|check| check.status.is_satisfied()))
        };

        if !all_ok(&self.chat_member) {
            return Some(RequirementKind::ChatMember);
        }
        if self.premium_user == Some(false) {
            return Some(RequirementKind::PremiumUser);
        }
        if !all_ok(&self.chat_booster) {
            return Some(RequirementKind::ChatBooster);
        }
        None
    }

    pub fn is_satisfied(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// 手动重新检查门槛
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RequirementCheckRequest {
    pub scope: RequirementScope,
    pub user: TelegramUser,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequirementCheckResponse {
    pub scope: RequirementScope,
    pub satisfied: bool,
    pub failed: Option<RequirementKind>,
    pub report: RequirementReport,
}

impl RequirementCheckResponse {
    pub fn new(scope: RequirementScope, report: RequirementReport) -> Self {
        let failed = report.first_failure();
        Self {
            scope,
            satisfied: failed.is_none(),
            failed,
            report,
        }
    }
}
