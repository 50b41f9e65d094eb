use crate::error::{AppError, AppResult};
use crate::external::ChatCapabilityProvider;
use crate::models::{
    ChatCheck, ChatRef, CheckStatus, RequirementKind, RequirementReport, RequirementSet,
    TelegramUser,
};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// 参与 / 投票门槛检查
///
/// - 各频道检查并发进行，单个失败不影响其它频道
/// - 接口错误或超时记为 Unavailable，按未满足处理（fail closed）
#[derive(Clone)]
pub struct RequirementService {
    provider: Arc<dyn ChatCapabilityProvider>,
    check_timeout: Duration,
}

impl RequirementService {
    pub fn new(provider: Arc<dyn ChatCapabilityProvider>, check_timeout: Duration) -> Self {
        Self {
            provider,
            check_timeout,
        }
    }

    /// 生成门槛检查报告（无副作用）
    ///
    /// membership_chats: 成员检查范围（可能包含系统频道）
    /// boost_chats: 助力检查范围（仅活动配置的频道）
    pub async fn check_requirements(
        &self,
        requirements: &RequirementSet,
        user: &TelegramUser,
        membership_chats: &[ChatRef],
        boost_chats: &[ChatRef],
    ) -> RequirementReport {
        let membership = async {
            if requirements.chat_member {
                Some(
                    self.check_chats(membership_chats, user.id, RequirementKind::ChatMember)
                        .await,
                )
            } else {
                None
            }
        };
        let boosts = async {
            if requirements.chat_booster {
                Some(
                    self.check_chats(boost_chats, user.id, RequirementKind::ChatBooster)
                        .await,
                )
            } else {
                None
            }
        };
        let (chat_member, chat_booster) = tokio::join!(membership, boosts);

        RequirementReport {
            chat_member,
            premium_user: requirements.premium_user.then_some(user.is_premium),
            chat_booster,
        }
    }

    /// 检查并在未满足时返回 RequirementNotMet
    pub async fn ensure_requirements(
        &self,
        requirements: &RequirementSet,
        user: &TelegramUser,
        membership_chats: &[ChatRef],
        boost_chats: &[ChatRef],
    ) -> AppResult<RequirementReport> {
        let report = self
            .check_requirements(requirements, user, membership_chats, boost_chats)
            .await;
        match report.first_failure() {
            Some(kind) => Err(AppError::RequirementNotMet(kind)),
            None => Ok(report),
        }
    }

    async fn check_chats(
        &self,
        chats: &[ChatRef],
        user_id: i64,
        capability: RequirementKind,
    ) -> Vec<ChatCheck> {
        let checks = chats.iter().map(|chat| async move {
            let check = async {
                match capability {
                    RequirementKind::ChatBooster => self.provider.is_booster(chat, user_id).await,
                    _ => self.provider.is_member(chat, user_id).await,
                }
            };
            let status = match tokio::time::timeout(self.check_timeout, check).await {
                Ok(Ok(true)) => CheckStatus::Satisfied,
                Ok(Ok(false)) => CheckStatus::NotSatisfied,
                Ok(Err(e)) => {
                    log::warn!(
                        "{capability} check unavailable: chat {} user {user_id}: {e}",
                        chat.id
                    );
                    CheckStatus::Unavailable
                }
                Err(_) => {
                    log::warn!(
                        "{capability} check timed out after {:?}: chat {} user {user_id}",
                        self.check_timeout,
                        chat.id
                    );
                    CheckStatus::Unavailable
                }
            };
            ChatCheck::new(chat, status)
        });
        join_all(checks).await
    }
}
