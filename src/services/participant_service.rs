use crate::entities::participant_entity as participants;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{GiveawayService, RequirementService, is_unique_violation, now_ts};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ParticipantService {
    pool: DatabaseConnection,
    giveaway_service: GiveawayService,
    requirement_service: RequirementService,
}

impl ParticipantService {
    pub fn new(
        pool: DatabaseConnection,
        giveaway_service: GiveawayService,
        requirement_service: RequirementService,
    ) -> Self {
        Self {
            pool,
            giveaway_service,
            requirement_service,
        }
    }

    /// 参与活动
    ///
    /// 逻辑:
    /// 1. 活动必须存在且处于 Ongoing
    /// 2. 校验参与门槛（成员 / 会员 / 助力）
    /// 3. 写入参与记录（重复参与返回已存在的参与者ID）
    pub async fn participate(
        &self,
        giveaway_id: &str,
        user: &TelegramUser,
    ) -> AppResult<ParticipantResponse> {
        let giveaway = self.giveaway_service.find_giveaway(giveaway_id).await?;
        GiveawayStatus::at(giveaway.start_time, giveaway.end_time, now_ts()).ensure_ongoing()?;

        let membership_chats =
            giveaway.membership_chats(self.giveaway_service.system_channel());
        self.requirement_service
            .ensure_requirements(
                &giveaway.participation_requirements,
                user,
                &membership_chats,
                &giveaway.chats.0,
            )
            .await?;

        let participant = self.add_participant(giveaway_id, user, None).await?;
        log::info!(
            "User {} joined giveaway {} as participant {}",
            user.id,
            giveaway_id,
            participant.id
        );
        Ok(participant.into())
    }

    /// 写入参与记录（先查后插，唯一索引兜底并发）
    ///
    /// participated_on 为空时取当前时间；传入值用于补录 / 测试
    pub async fn add_participant(
        &self,
        giveaway_id: &str,
        user: &TelegramUser,
        participated_on: Option<i64>,
    ) -> AppResult<participants::Model> {
        if let Some(existing) = self.find_by_user(giveaway_id, user.id).await? {
            return Err(AppError::already_participated(existing.id));
        }

        let inserted = participants::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            giveaway_id: Set(giveaway_id.to_string()),
            user_id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            username: Set(user.username.clone()),
            is_premium: Set(user.is_premium),
            photo_url: Set(user.photo_url.clone()),
            participated_on: Set(participated_on.unwrap_or_else(now_ts)),
        }
        .insert(&self.pool)
        .await;

        match inserted {
            Ok(model) => Ok(model),
            Err(e) if is_unique_violation(&e) => {
                // 并发请求已抢先写入
                let existing = self.find_by_user(giveaway_id, user.id).await?.ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Participant for user {} vanished after unique violation",
                        user.id
                    ))
                })?;
                Err(AppError::already_participated(existing.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 参与总人数 + 当前用户的参与者ID
    pub async fn get_participants_count(
        &self,
        giveaway_id: &str,
        user_id: i64,
    ) -> AppResult<ParticipantsCountResponse> {
        let count = participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .count(&self.pool)
            .await?;
        let own = self.find_by_user(giveaway_id, user_id).await?;

        Ok(ParticipantsCountResponse {
            count,
            id: own.map(|p| p.id),
        })
    }

    pub async fn get_participant(&self, participant_id: &str) -> AppResult<ParticipantResponse> {
        Ok(self.find_participant(participant_id).await?.into())
    }

    pub async fn find_participant(&self, participant_id: &str) -> AppResult<participants::Model> {
        participants::Entity::find_by_id(participant_id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))
    }

    pub async fn find_by_user(
        &self,
        giveaway_id: &str,
        user_id: i64,
    ) -> AppResult<Option<participants::Model>> {
        Ok(participants::Entity::find()
            .filter(participants::Column::GiveawayId.eq(giveaway_id))
            .filter(participants::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?)
    }
}
