use crate::entities::giveaway_entity as giveaways;
use crate::error::{AppError, AppResult};
use crate::external::NotificationSender;
use crate::models::*;
use crate::services::{RequirementService, now_ts};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// 校验并规范化后的创建参数
#[derive(Debug, Clone, PartialEq)]
struct ValidatedGiveaway {
    chats: Vec<ChatRef>,
    num_winners: i32,
    min_votes: i32,
    participation_requirements: RequirementSet,
    voting_requirements: RequirementSet,
    rewards: Rewards,
}

fn validate_create_request(req: &CreateGiveawayRequest) -> AppResult<ValidatedGiveaway> {
    if req.chats.is_empty() {
        return Err(AppError::ValidationError(
            "At least one chat is required".to_string(),
        ));
    }

    let num_winners = req.num_winners.unwrap_or(DEFAULT_NUM_WINNERS);
    if num_winners < 1 {
        return Err(AppError::ValidationError(
            "Number of winners must be at least 1".to_string(),
        ));
    }

    let min_votes = req.min_votes.unwrap_or(DEFAULT_MIN_VOTES);
    if min_votes < 1 {
        return Err(AppError::ValidationError(
            "Minimum votes must be at least 1".to_string(),
        ));
    }

    if req.end_time <= req.start_time {
        return Err(AppError::ValidationError(
            "End time must be after start time".to_string(),
        ));
    }

    let rewards = Rewards::normalized(req.rewards.clone(), num_winners)?;

    // 系统频道只来自配置
    let chats = req
        .chats
        .iter()
        .cloned()
        .map(|chat| ChatRef {
            is_system: false,
            ..chat
        })
        .collect();

    Ok(ValidatedGiveaway {
        chats,
        num_winners,
        min_votes,
        participation_requirements: req
            .participation_requirements
            .unwrap_or_default()
            .normalized(),
        voting_requirements: req.voting_requirements.unwrap_or_default().normalized(),
        rewards,
    })
}

fn creation_message(participation_link: &str) -> String {
    format!(
        "✅ <b>Giveaway Created Successfully!</b>\n\n\
         <b>Participation Link:</b> <i>{participation_link}</i>\n\n\
         Users can join or view the giveaway by opening the participation link."
    )
}

#[derive(Clone)]
pub struct GiveawayService {
    pool: DatabaseConnection,
    requirement_service: RequirementService,
    notifier: Arc<dyn NotificationSender>,
    notify_timeout: Duration,
    bot_username: String,
    system_channel: Option<ChatRef>,
}

impl GiveawayService {
    pub fn new(
        pool: DatabaseConnection,
        requirement_service: RequirementService,
        notifier: Arc<dyn NotificationSender>,
        notify_timeout: Duration,
        bot_username: String,
        system_channel: Option<ChatRef>,
    ) -> Self {
        Self {
            pool,
            requirement_service,
            notifier,
            notify_timeout,
            bot_username,
            system_channel,
        }
    }

    /// 创建活动
    ///
    /// 逻辑:
    /// 1. 校验参数并补默认值（num_winners=3, min_votes=1）
    /// 2. 成员检查强制开启，奖励去空白
    /// 3. 写入活动
    /// 4. 通过 bot 通知创建者（失败只记日志）
    pub async fn create_giveaway(
        &self,
        req: CreateGiveawayRequest,
    ) -> AppResult<CreateGiveawayResponse> {
        let validated = validate_create_request(&req)?;
        let now = now_ts();

        let model = giveaways::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            chats: Set(ChatList(validated.chats)),
            num_winners: Set(validated.num_winners),
            min_votes: Set(validated.min_votes),
            participation_requirements: Set(validated.participation_requirements),
            voting_requirements: Set(validated.voting_requirements),
            rewards: Set(validated.rewards),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            created_by: Set(req.user.clone()),
            created_on: Set(now),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Giveaway {} created by user {}", model.id, req.user.id);

        let participation_link = self.participation_link(&model.id);
        let notified = tokio::time::timeout(
            self.notify_timeout,
            self.notifier
                .notify(req.user.id, &creation_message(&participation_link)),
        )
        .await
        .unwrap_or(false);
        if !notified {
            log::warn!(
                "Failed to notify creator {} about giveaway {}",
                req.user.id,
                model.id
            );
        }

        Ok(CreateGiveawayResponse {
            giveaway: GiveawayResponse::from_model(model, now, self.system_channel()),
            participation_link,
            notified,
        })
    }

    pub async fn get_giveaway(&self, giveaway_id: &str) -> AppResult<GiveawayResponse> {
        let model = self.find_giveaway(giveaway_id).await?;
        Ok(GiveawayResponse::from_model(
            model,
            now_ts(),
            self.system_channel(),
        ))
    }

    pub async fn find_giveaway(&self, giveaway_id: &str) -> AppResult<giveaways::Model> {
        giveaways::Entity::find_by_id(giveaway_id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Giveaway not found".to_string()))
    }

    /// 手动重新检查门槛（不写入任何记录）
    pub async fn check_requirements(
        &self,
        giveaway_id: &str,
        req: &RequirementCheckRequest,
    ) -> AppResult<RequirementCheckResponse> {
        let giveaway = self.find_giveaway(giveaway_id).await?;
        let requirements = match req.scope {
            RequirementScope::Participation => &giveaway.participation_requirements,
            RequirementScope::Voting => &giveaway.voting_requirements,
        };
        let membership_chats = giveaway.membership_chats(self.system_channel());

        let report = self
            .requirement_service
            .check_requirements(requirements, &req.user, &membership_chats, &giveaway.chats.0)
            .await;
        Ok(RequirementCheckResponse::new(req.scope, report))
    }

    pub fn system_channel(&self) -> Option<&ChatRef> {
        self.system_channel.as_ref()
    }

    /// Mini App 参与链接
    pub fn participation_link(&self, giveaway_id: &str) -> String {
        format!(
            "https://t.me/{}/giveaway?startapp={}",
            self.bot_username, giveaway_id
        )
    }
}
