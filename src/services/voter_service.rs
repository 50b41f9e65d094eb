use crate::entities::{VoteState, voter_entity as voters};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{
    GiveawayService, ParticipantService, RequirementService, is_unique_violation, now_ts,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// 唯一索引冲突后的重复投票错误；并发写入的记录读不到时不带 existing_id
fn conflicting_vote(existing: Option<voters::Model>) -> AppError {
    match existing {
        Some(record) => AppError::already_voted(record.id),
        None => AppError::Duplicate {
            message: "You have already voted for this participant.".to_string(),
            existing_id: None,
        },
    }
}

#[derive(Clone)]
pub struct VoterService {
    pool: DatabaseConnection,
    giveaway_service: GiveawayService,
    participant_service: ParticipantService,
    requirement_service: RequirementService,
}

impl VoterService {
    pub fn new(
        pool: DatabaseConnection,
        giveaway_service: GiveawayService,
        participant_service: ParticipantService,
        requirement_service: RequirementService,
    ) -> Self {
        Self {
            pool,
            giveaway_service,
            participant_service,
            requirement_service,
        }
    }

    /// 为参与者投票
    ///
    /// 逻辑:
    /// 1. 参与者与所属活动必须存在，活动处于 Ongoing
    /// 2. 校验投票门槛
    /// 3. 写入 / 恢复投票记录
    pub async fn vote(&self, participant_id: &str, user: &TelegramUser) -> AppResult<VoteResponse> {
        let participant = self.participant_service.find_participant(participant_id).await?;
        let giveaway = self
            .giveaway_service
            .find_giveaway(&participant.giveaway_id)
            .await?;
        GiveawayStatus::at(giveaway.start_time, giveaway.end_time, now_ts()).ensure_ongoing()?;

        let membership_chats =
            giveaway.membership_chats(self.giveaway_service.system_channel());
        self.requirement_service
            .ensure_requirements(
                &giveaway.voting_requirements,
                user,
                &membership_chats,
                &giveaway.chats.0,
            )
            .await?;

        let (voter, outcome) = self
            .add_vote(&giveaway.id, &participant.id, user, None)
            .await?;
        log::info!(
            "User {} voted for participant {} in giveaway {} ({:?})",
            user.id,
            participant.id,
            giveaway.id,
            outcome
        );
        Ok(VoteResponse {
            voter: voter.into(),
            outcome,
        })
    }

    /// 写入投票（三种情况）:
    /// - 已有有效投票 -> Duplicate
    /// - 已有失效投票 -> 原地恢复为有效，voted_on 保持不变
    /// - 无记录 -> 插入新记录
    pub async fn add_vote(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        voter: &TelegramUser,
        voted_on: Option<i64>,
    ) -> AppResult<(voters::Model, VoteOutcome)> {
        let existing = self.find_vote(giveaway_id, participant_id, voter.id).await?;

        match existing {
            Some(record) => match record.state {
                VoteState::Active => Err(AppError::already_voted(record.id)),
                VoteState::Invalidated => {
                    let reactivated = self.reactivate(record).await?;
                    Ok((reactivated, VoteOutcome::Reactivated))
                }
            },
            None => {
                let created = self
                    .insert_vote(giveaway_id, participant_id, voter, voted_on)
                    .await?;
                Ok((created, VoteOutcome::Created))
            }
        }
    }

    /// 标记投票失效（风控等外部流程调用）；已失效时幂等返回
    pub async fn invalidate_vote(&self, voter_id: &str) -> AppResult<voters::Model> {
        let record = voters::Entity::find_by_id(voter_id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Vote not found".to_string()))?;

        if record.state == VoteState::Invalidated {
            return Ok(record);
        }

        voters::Entity::update_many()
            .col_expr(voters::Column::State, Expr::value(VoteState::Invalidated))
            .filter(voters::Column::Id.eq(record.id.clone()))
            .exec(&self.pool)
            .await?;

        log::info!(
            "Vote {} for participant {} invalidated",
            record.id,
            record.participant_id
        );
        Ok(voters::Model {
            state: VoteState::Invalidated,
            ..record
        })
    }

    /// 查看者当前是否对该参与者有有效投票（失效记录不算）
    pub async fn has_active_vote(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        voter_user_id: i64,
    ) -> AppResult<bool> {
        Ok(self
            .find_vote(giveaway_id, participant_id, voter_user_id)
            .await?
            .is_some_and(|v| v.state.is_active()))
    }

    /// 参与者的有效投票人列表（按投票时间倒序）
    pub async fn list_voters(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        viewer_id: i64,
    ) -> AppResult<Vec<VoterListItem>> {
        let records = voters::Entity::find()
            .filter(voters::Column::GiveawayId.eq(giveaway_id))
            .filter(voters::Column::ParticipantId.eq(participant_id))
            .filter(voters::Column::State.eq(VoteState::Active))
            .order_by_desc(voters::Column::VotedOn)
            .order_by_asc(voters::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(records
            .into_iter()
            .map(|v| VoterListItem::from_model(v, viewer_id))
            .collect())
    }

    /// 通过参与者ID查询投票人列表
    pub async fn list_participant_voters(
        &self,
        participant_id: &str,
        viewer_id: i64,
    ) -> AppResult<Vec<VoterListItem>> {
        let participant = self.participant_service.find_participant(participant_id).await?;
        self.list_voters(&participant.giveaway_id, &participant.id, viewer_id)
            .await
    }

    async fn find_vote(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        voter_user_id: i64,
    ) -> AppResult<Option<voters::Model>> {
        Ok(voters::Entity::find()
            .filter(voters::Column::GiveawayId.eq(giveaway_id))
            .filter(voters::Column::ParticipantId.eq(participant_id))
            .filter(voters::Column::VoterUserId.eq(voter_user_id))
            .one(&self.pool)
            .await?)
    }

    /// 条件更新（where state = invalidated），并发恢复时只有一个请求成功
    async fn reactivate(&self, record: voters::Model) -> AppResult<voters::Model> {
        let result = voters::Entity::update_many()
            .col_expr(voters::Column::State, Expr::value(VoteState::Active))
            .filter(voters::Column::Id.eq(record.id.clone()))
            .filter(voters::Column::State.eq(VoteState::Invalidated))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::already_voted(record.id));
        }

        Ok(voters::Model {
            state: VoteState::Active,
            ..record
        })
    }

    async fn insert_vote(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        voter: &TelegramUser,
        voted_on: Option<i64>,
    ) -> AppResult<voters::Model> {
        let inserted = voters::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            giveaway_id: Set(giveaway_id.to_string()),
            participant_id: Set(participant_id.to_string()),
            voter_user_id: Set(voter.id),
            first_name: Set(voter.first_name.clone()),
            last_name: Set(voter.last_name.clone()),
            username: Set(voter.username.clone()),
            is_premium: Set(voter.is_premium),
            photo_url: Set(voter.photo_url.clone()),
            voted_on: Set(voted_on.unwrap_or_else(now_ts)),
            state: Set(VoteState::Active),
        }
        .insert(&self.pool)
        .await;

        match inserted {
            Ok(model) => Ok(model),
            Err(e) if is_unique_violation(&e) => {
                let existing = self
                    .find_vote(giveaway_id, participant_id, voter.id)
                    .await?;
                Err(conflicting_vote(existing))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> voters::Model {
        voters::Model {
            id: id.to_string(),
            giveaway_id: "g1".to_string(),
            participant_id: "p1".to_string(),
            voter_user_id: 7,
            first_name: "Alice".to_string(),
            last_name: String::new(),
            username: String::new(),
            is_premium: false,
            photo_url: String::new(),
            voted_on: 100,
            state: VoteState::Active,
        }
    }

    #[test]
    fn test_conflicting_vote_points_at_winner() {
        match conflicting_vote(Some(record("v-1"))) {
            AppError::Duplicate { existing_id, .. } => {
                assert_eq!(existing_id.as_deref(), Some("v-1"))
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_vote_without_winner_has_no_id() {
        match conflicting_vote(None) {
            AppError::Duplicate { existing_id, .. } => assert!(existing_id.is_none()),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }
}
