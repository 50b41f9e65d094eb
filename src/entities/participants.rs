use crate::models::TelegramUser;
use sea_orm::entity::prelude::*;

/// 参与者实体
/// 说明:
/// - (giveaway_id, user_id) 唯一
/// - 用户信息为参与时的快照
/// - participated_on 用于排行榜同票排序（越早越靠前）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub giveaway_id: String,
    /// Telegram 用户ID
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_premium: bool,
    pub photo_url: String,
    pub participated_on: i64,
}

impl Model {
    pub fn user(&self) -> TelegramUser {
        TelegramUser {
            id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            is_premium: self.is_premium,
            photo_url: self.photo_url.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
