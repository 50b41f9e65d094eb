use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Telegram 用户快照（由 Mini App initData 提供，身份已在外部校验）
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
pub struct TelegramUser {
    #[schema(example = 123456789)]
    pub id: i64,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub photo_url: String,
}

impl TelegramUser {
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

/// "first last"，last_name 为空时只显示 first_name
pub fn display_name(first_name: &str, last_name: &str) -> String {
    if last_name.is_empty() {
        first_name.to_string()
    } else {
        format!("{first_name} {last_name}")
    }
}

/// 空字符串在响应中输出为 null
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
