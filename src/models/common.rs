use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{GiveawayStatus, RequirementKind};

/// 错误响应体 `{"success": false, "error": ApiError}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "DUPLICATE")]
    pub code: String,
    pub message: String,
    /// 重复参与 / 投票时已存在的记录ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<RequirementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GiveawayStatus>,
}

/// 排行榜 / 名次 / 投票人列表查询时的观看者
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ViewerQuery {
    pub viewer_id: i64,
}

/// 参与人数查询
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserQuery {
    pub user_id: i64,
}
