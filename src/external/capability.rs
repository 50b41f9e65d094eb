use crate::error::AppResult;
use crate::models::ChatRef;
use async_trait::async_trait;

/// Telegram getChatMember 中视为成员的状态
pub const MEMBER_STATUSES: [&str; 3] = ["creator", "administrator", "member"];

/// 频道成员 / 助力查询能力（由 bot 集成提供）
///
/// 实现方只负责如实返回接口结果或错误；失败按未满足处理由门槛检查统一完成。
#[async_trait]
pub trait ChatCapabilityProvider: Send + Sync {
    /// 用户在频道中的状态（creator / administrator / member / left / kicked ...）
    async fn chat_member_status(&self, chat: &ChatRef, user_id: i64) -> AppResult<String>;

    /// 用户对该频道的有效助力数
    async fn boost_count(&self, chat: &ChatRef, user_id: i64) -> AppResult<usize>;

    async fn is_member(&self, chat: &ChatRef, user_id: i64) -> AppResult<bool> {
        let status = self.chat_member_status(chat, user_id).await?;
        Ok(MEMBER_STATUSES.contains(&status.as_str()))
    }

    async fn is_booster(&self, chat: &ChatRef, user_id: i64) -> AppResult<bool> {
        Ok(self.boost_count(chat, user_id).await? > 0)
    }
}

/// 消息通知（尽力而为，失败不回滚业务写入）
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(&self, user_id: i64, text: &str) -> bool;
}
