use crate::entities::{VoteState, participant_entity as participants, voter_entity as voters};
use crate::error::AppResult;
use crate::models::*;
use crate::services::{GiveawayService, ParticipantService, VoterService};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, FromQueryResult)]
struct VoteCountRow {
    participant_id: String,
    vote_count: i64,
}

/// 排序规则: 票数降序 -> 参与时间升序（越早越靠前）-> 参与者ID升序（保证稳定）
fn compare_entries(a: &ParticipantRank, b: &ParticipantRank) -> Ordering {
    b.vote_count
        .cmp(&a.vote_count)
        .then_with(|| a.participated_on.cmp(&b.participated_on))
        .then_with(|| a.id.cmp(&b.id))
}

/// 将票数聚合结果与参与者记录合并并排序，名次从 1 开始
///
/// 找不到参与者记录的聚合项直接跳过（数据漂移，只记日志）
pub fn rank_participants(
    vote_counts: impl IntoIterator<Item = (String, u64)>,
    participants: &HashMap<String, participants::Model>,
) -> Vec<ParticipantRank> {
    let mut entries: Vec<ParticipantRank> = vote_counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .filter_map(|(participant_id, count)| match participants.get(&participant_id) {
            Some(p) => Some(ParticipantRank::from_participant(p, count, None)),
            None => {
                log::warn!(
                    "Skipping {count} vote(s) for unknown participant {participant_id}"
                );
                None
            }
        })
        .collect();

    entries.sort_by(compare_entries);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(index as u32 + 1);
    }
    entries
}

/// 有效获奖人数：榜上（至少一票）且票数 >= min_votes
pub fn eligible_winners_count(ranked: &[ParticipantRank], min_votes: i32) -> u64 {
    let threshold = u64::try_from(min_votes.max(1)).unwrap_or(1);
    ranked
        .iter()
        .filter(|entry| entry.vote_count >= threshold)
        .count() as u64
}

#[derive(Clone)]
pub struct LeaderboardService {
    pool: DatabaseConnection,
    giveaway_service: GiveawayService,
    participant_service: ParticipantService,
    voter_service: VoterService,
}

impl LeaderboardService {
    pub fn new(
        pool: DatabaseConnection,
        giveaway_service: GiveawayService,
        participant_service: ParticipantService,
        voter_service: VoterService,
    ) -> Self {
        Self {
            pool,
            giveaway_service,
            participant_service,
            voter_service,
        }
    }

    /// 按活动配置的 min_votes 获取排行榜
    pub async fn get_leaderboard(
        &self,
        giveaway_id: &str,
        viewer_user_id: i64,
    ) -> AppResult<LeaderboardResponse> {
        let giveaway = self.giveaway_service.find_giveaway(giveaway_id).await?;
        self.compute_leaderboard(&giveaway.id, viewer_user_id, giveaway.min_votes)
            .await
    }

    /// 排行榜
    ///
    /// 逻辑:
    /// 1. 聚合有效投票，按参与者分组计票（零票参与者不出现）
    /// 2. 关联参与者记录并排序
    /// 3. 查看者在榜上则取榜上条目；否则若为参与者，直接查询并返回 0 票、无名次
    /// 4. 统计达到 min_votes 的人数
    pub async fn compute_leaderboard(
        &self,
        giveaway_id: &str,
        viewer_user_id: i64,
        min_votes: i32,
    ) -> AppResult<LeaderboardResponse> {
        let leaderboard = self.ranked_participants(giveaway_id).await?;

        let viewer = match leaderboard.iter().find(|e| e.user_id == viewer_user_id) {
            Some(entry) => Some(entry.clone()),
            None => self
                .participant_service
                .find_by_user(giveaway_id, viewer_user_id)
                .await?
                .map(|p| ParticipantRank::from_participant(&p, 0, None)),
        };

        let eligible_winners_count = eligible_winners_count(&leaderboard, min_votes);

        Ok(LeaderboardResponse {
            leaderboard,
            viewer,
            eligible_winners_count,
        })
    }

    /// 单个参与者的名次、票数，以及查看者是否已对其投票
    pub async fn compute_rank(
        &self,
        giveaway_id: &str,
        participant_id: &str,
        viewer_user_id: i64,
    ) -> AppResult<RankResponse> {
        let ranked = self.ranked_participants(giveaway_id).await?;
        let entry = ranked.iter().find(|e| e.id == participant_id);

        let has_voter_voted = self
            .voter_service
            .has_active_vote(giveaway_id, participant_id, viewer_user_id)
            .await?;

        Ok(RankResponse {
            rank: entry.and_then(|e| e.rank),
            vote_count: entry.map(|e| e.vote_count).unwrap_or(0),
            has_voter_voted,
        })
    }

    /// 通过参与者ID查询名次
    pub async fn get_participant_rank(
        &self,
        participant_id: &str,
        viewer_user_id: i64,
    ) -> AppResult<RankResponse> {
        let participant = self
            .participant_service
            .find_participant(participant_id)
            .await?;
        self.compute_rank(&participant.giveaway_id, &participant.id, viewer_user_id)
            .await
    }

    async fn ranked_participants(&self, giveaway_id: &str) -> AppResult<Vec<ParticipantRank>> {
        let counts = self.active_vote_counts(giveaway_id).await?;
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = counts.iter().map(|(id, _)| id.clone()).collect();
        let participants: HashMap<String, participants::Model> = participants::Entity::find()
            .filter(participants::Column::Id.is_in(ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(rank_participants(counts, &participants))
    }

    async fn active_vote_counts(&self, giveaway_id: &str) -> AppResult<Vec<(String, u64)>> {
        let rows = voters::Entity::find()
            .select_only()
            .column(voters::Column::ParticipantId)
            .column_as(Expr::col(voters::Column::Id).count(), "vote_count")
            .filter(voters::Column::GiveawayId.eq(giveaway_id))
            .filter(voters::Column::State.eq(VoteState::Active))
            .group_by(voters::Column::ParticipantId)
            .into_model::<VoteCountRow>()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.participant_id, u64::try_from(r.vote_count).unwrap_or(0)))
            .collect())
    }
}
