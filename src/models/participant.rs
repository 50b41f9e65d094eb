use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TelegramUser;
use crate::entities::participant_entity as participants;

/// 参与活动请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ParticipateRequest {
    pub user: TelegramUser,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: String,
    pub giveaway_id: String,
    pub user: TelegramUser,
    pub participated_on: i64,
}

impl From<participants::Model> for ParticipantResponse {
    fn from(m: participants::Model) -> Self {
        ParticipantResponse {
            user: m.user(),
            id: m.id,
            giveaway_id: m.giveaway_id,
            participated_on: m.participated_on,
        }
    }
}

/// 参与人数 + 当前用户自己的参与者ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ParticipantsCountResponse {
    pub count: u64,
    pub id: Option<String>,
}
